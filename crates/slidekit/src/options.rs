use slidekit_foundation::PagesPerViewRounding;

/// Default transition length in milliseconds.
pub const DEFAULT_SPEED_MILLIS: u32 = 300;

/// Configuration for a [`Carousel`](crate::Carousel).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct CarouselOptions {
    /// Index shown after construction. Clamped or wrapped like any target.
    pub start_slide: isize,
    /// Transition length in milliseconds.
    pub speed: u32,
    /// Wrap past the first and last index instead of stopping.
    pub continuous: bool,
    /// Auto-advance delay in milliseconds; 0 disables it.
    pub auto_advance_delay: u64,
    /// Any interaction stops auto-advance for good instead of pausing it.
    pub auto_stop_on_interaction: bool,
    /// Tosses always come to rest on a whole page.
    pub snap_to_nearest: bool,
    /// Toss even when a single page fills the view.
    pub allow_momentum_toss_single_view: bool,
    /// Ask hosts to suppress native scrolling for every move, not just
    /// horizontal drags.
    pub disable_native_scroll: bool,
    pub rounding: PagesPerViewRounding,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            start_slide: 0,
            speed: DEFAULT_SPEED_MILLIS,
            continuous: false,
            auto_advance_delay: 0,
            auto_stop_on_interaction: false,
            snap_to_nearest: false,
            allow_momentum_toss_single_view: false,
            disable_native_scroll: false,
            rounding: PagesPerViewRounding::Floor,
        }
    }
}

impl CarouselOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_slide(mut self, start_slide: isize) -> Self {
        self.start_slide = start_slide;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn with_auto_advance(mut self, delay_millis: u64) -> Self {
        self.auto_advance_delay = delay_millis;
        self
    }

    pub fn with_auto_stop_on_interaction(mut self, auto_stop: bool) -> Self {
        self.auto_stop_on_interaction = auto_stop;
        self
    }

    pub fn with_snap_to_nearest(mut self, snap: bool) -> Self {
        self.snap_to_nearest = snap;
        self
    }

    pub fn with_momentum_toss_single_view(mut self, allow: bool) -> Self {
        self.allow_momentum_toss_single_view = allow;
        self
    }

    pub fn with_disable_native_scroll(mut self, disable: bool) -> Self {
        self.disable_native_scroll = disable;
        self
    }

    pub fn with_rounding(mut self, rounding: PagesPerViewRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Half the configured speed, used for snap-backs and post-toss settles.
    pub(crate) fn half_speed(&self) -> u32 {
        self.speed / 2
    }
}
