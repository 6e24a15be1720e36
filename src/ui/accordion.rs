#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionIcon {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq)]
struct Panel {
    scroll_height: f64,
    open: bool,
}

/// FAQ accordion. Panels open independently.
#[derive(Debug, Default)]
pub struct Accordion {
    panels: Vec<Panel>,
}

impl Accordion {
    /// One panel per content height, all closed.
    pub fn new(scroll_heights: &[f64]) -> Self {
        Self {
            panels: scroll_heights
                .iter()
                .map(|h| Panel {
                    scroll_height: h.max(0.0),
                    open: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Open a closed panel to its content height, or close an open one.
    /// Returns the new open state; `None` for an unknown index.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let panel = self.panels.get_mut(index)?;
        panel.open = !panel.open;
        Some(panel.open)
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.panels.get(index).is_some_and(|p| p.open)
    }

    /// `max-height` in px: the content height when open, else 0.
    pub fn max_height(&self, index: usize) -> Option<f64> {
        self.panels
            .get(index)
            .map(|p| if p.open { p.scroll_height } else { 0.0 })
    }

    pub fn icon(&self, index: usize) -> AccordionIcon {
        if self.is_open(index) {
            AccordionIcon::Minus
        } else {
            AccordionIcon::Plus
        }
    }
}
