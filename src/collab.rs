//! Narrow interfaces the simulation calls out through.
//!
//! Implementations must never fail back into the simulation: a sound that
//! cannot play or an overlay that cannot draw is simply skipped.

/// Sound effects and music. Every call is fire-and-forget.
pub trait Audio {
    fn play_launch(&mut self);
    fn play_explosion(&mut self);
    /// Starts the looping background track. The show calls this at most once.
    fn play_background_music(&mut self);
    fn pause_background_music(&mut self) {}
    fn resume_background_music(&mut self) {}
}

/// On-screen text that is not part of the particle show.
pub trait Overlay {
    fn show_hint(&mut self, text: &str);
    fn hide_hint(&mut self);
    fn set_click_count(&mut self, _total: u32) {}
    /// Makes the click counter visible from now on.
    fn reveal_click_count(&mut self) {}
    fn set_wish_progress(&mut self, _shown: usize, _total: usize) {}
    fn show_credits(&mut self, _text: &str, _link: Option<&str>) {}
}

/// Audio sink for hosts without sound output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Audio for Silent {
    fn play_launch(&mut self) {
        log::trace!("launch sound");
    }

    fn play_explosion(&mut self) {
        log::trace!("explosion sound");
    }

    fn play_background_music(&mut self) {
        log::debug!("background music requested, no audio output available");
    }
}
