//! Page widgets. Each controller owns its view state and is driven by
//! explicit events plus the shared `Timers` table.

pub mod accordion;
pub mod carousel;
pub mod counter;
pub mod gallery;
pub mod listing;
pub mod media;
pub mod navbar;
pub mod slider;
pub mod theme;
pub mod toast;

pub use accordion::{Accordion, AccordionIcon};
pub use carousel::{BlogCarousel, Direction};
pub use counter::{Counter, StatsCounters};
pub use gallery::{CardTransform, CylinderGallery};
pub use listing::{ListingForm, PillGroup, Preview, SelectedFile};
pub use media::{Media, Video};
pub use navbar::Navbar;
pub use slider::{Slide, Slider};
pub use theme::{MemoryStore, RonFileStore, ThemeController, ThemeMode, ThemeStore, ThemeView};
pub use toast::{Toast, ToastKind, Toasts};
