use ratatui::widgets::ListState;
use votd_core::{ApiBibleClient, LabsBibleClient, Translation, VerseFetcher};

use crate::platform::SystemPlatform;

pub type Fetcher = VerseFetcher<LabsBibleClient, ApiBibleClient, SystemPlatform>;

pub struct App {
    pub should_quit: bool,
    pub fetcher: Fetcher,

    // Translation picker popup
    pub show_translation_picker: bool,
    pub translation_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            should_quit: false,
            fetcher,
            show_translation_picker: false,
            translation_state: ListState::default(),
            animation_frame: 0,
        }
    }

    pub fn open_translation_picker(&mut self) {
        let current = self.fetcher.translation();
        let index = Translation::all().iter().position(|t| *t == current);
        self.translation_state.select(index.or(Some(0)));
        self.show_translation_picker = true;
    }

    pub fn close_translation_picker(&mut self) {
        self.show_translation_picker = false;
    }

    pub fn picker_down(&mut self) {
        let len = Translation::all().len();
        let i = self.translation_state.selected().unwrap_or(0);
        self.translation_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn picker_up(&mut self) {
        let i = self.translation_state.selected().unwrap_or(0);
        self.translation_state.select(Some(i.saturating_sub(1)));
    }

    /// Apply the highlighted translation and close the picker.
    pub fn confirm_translation(&mut self) {
        let selected = self
            .translation_state
            .selected()
            .and_then(|i| Translation::all().get(i).copied());
        if let Some(translation) = selected {
            self.select_translation(translation);
        }
        self.show_translation_picker = false;
    }

    pub fn select_translation(&mut self, translation: Translation) {
        self.fetcher.clear_notice();
        self.fetcher.set_translation(translation);
    }

    pub fn request_random_verse(&mut self) {
        self.fetcher.clear_notice();
        self.fetcher.request_random_verse();
    }

    pub async fn copy_verse(&mut self) {
        // Outcome is recorded in the fetcher state (copied flag or notice).
        let _ = self.fetcher.copy_to_clipboard().await;
    }

    pub async fn share_verse(&mut self) {
        let _ = self.fetcher.share_verse().await;
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }

    pub async fn on_tick(&mut self) {
        self.fetcher.tick();
        self.fetcher.poll().await;
        if self.fetcher.state().loading {
            self.tick_animation();
        } else {
            self.animation_frame = 0;
        }
    }
}
