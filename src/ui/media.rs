/// Volume applied when audio is unlocked.
pub const UNLOCK_VOLUME: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub muted: bool,
    pub volume: f64,
    pub playing: bool,
    /// False while the page section holding the video is hidden.
    pub on_visible_page: bool,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            muted: true,
            volume: 1.0,
            playing: true,
            on_visible_page: true,
        }
    }
}

/// Background videos, the one-shot audio unlock and the pause watchdog.
#[derive(Debug)]
pub struct Media {
    pub videos: Vec<Video>,
    pub sound_hint_visible: bool,
    pub document_visible: bool,
    audio_unlocked: bool,
}

impl Media {
    pub fn new(video_count: usize) -> Self {
        Self {
            videos: vec![Video::default(); video_count],
            sound_hint_visible: true,
            document_visible: true,
            audio_unlocked: false,
        }
    }

    pub fn audio_unlocked(&self) -> bool {
        self.audio_unlocked
    }

    /// First click or touch anywhere. Returns true only the first time.
    pub fn on_user_interaction(&mut self) -> bool {
        if self.audio_unlocked {
            return false;
        }
        self.audio_unlocked = true;
        for v in &mut self.videos {
            v.muted = false;
            v.volume = UNLOCK_VOLUME;
            v.playing = true;
        }
        self.sound_hint_visible = false;
        log::debug!("audio unlocked for {} videos", self.videos.len());
        true
    }

    /// A video paused. Resumes it when its page and the document are both
    /// visible; returns whether it was resumed.
    pub fn on_video_paused(&mut self, index: usize) -> bool {
        let document_visible = self.document_visible;
        let Some(video) = self.videos.get_mut(index) else {
            return false;
        };
        video.playing = false;
        if video.on_visible_page && document_visible {
            log::debug!("video {index} paused unexpectedly, resuming");
            video.playing = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_is_one_shot() {
        let mut media = Media::new(2);
        assert!(media.on_user_interaction());
        assert!(!media.sound_hint_visible);
        assert!(media.videos.iter().all(|v| !v.muted && v.volume == UNLOCK_VOLUME));

        media.videos[0].volume = 0.2;
        assert!(!media.on_user_interaction());
        assert_eq!(media.videos[0].volume, 0.2);
    }

    #[test]
    fn watchdog_resumes_only_visible_videos() {
        let mut media = Media::new(3);
        assert!(media.on_video_paused(0));
        assert!(media.videos[0].playing);

        media.videos[1].on_visible_page = false;
        assert!(!media.on_video_paused(1));
        assert!(!media.videos[1].playing);

        media.document_visible = false;
        assert!(!media.on_video_paused(2));
        assert!(!media.on_video_paused(7));
    }
}
