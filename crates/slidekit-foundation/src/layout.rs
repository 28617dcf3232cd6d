//! Viewport and page measurement.

use std::fmt;

/// Guard against probe chains that never reach a measured ancestor.
const MAX_PROBE_DEPTH: usize = 32;

/// How `pages_per_view` is derived from `viewport_width / page_width`.
///
/// The two policies differ whenever the ratio is not a whole number: `Floor`
/// counts only fully visible pages, `Ceil` also counts a partially visible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PagesPerViewRounding {
    #[default]
    Floor,
    Ceil,
}

impl PagesPerViewRounding {
    fn apply(self, ratio: f32) -> f32 {
        match self {
            PagesPerViewRounding::Floor => ratio.floor(),
            PagesPerViewRounding::Ceil => ratio.ceil(),
        }
    }
}

/// Width a host element declares when it has no rendered width yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeclaredWidth {
    /// Take the parent's resolved width.
    Auto,
    /// A percentage (0-100) of the parent's resolved width.
    Percent(f32),
    /// Absolute logical pixels.
    Px(f32),
}

/// Read-only view of something with a width: the viewport or a page.
pub trait WidthProbe {
    /// Width as currently rendered. Zero for hidden elements.
    fn rendered_width(&self) -> f32;

    fn declared_width(&self) -> DeclaredWidth {
        DeclaredWidth::Auto
    }

    fn parent(&self) -> Option<&dyn WidthProbe> {
        None
    }
}

/// A probe with a fixed rendered width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidth(pub f32);

impl WidthProbe for FixedWidth {
    fn rendered_width(&self) -> f32 {
        self.0
    }

    fn declared_width(&self) -> DeclaredWidth {
        DeclaredWidth::Px(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    /// `Auto` or `Percent` was declared with no parent to resolve against.
    MissingParent,
    /// The probe chain was deeper than the resolver follows.
    TooDeep { depth: usize },
    /// Resolution finished with a zero, negative or non-finite width.
    NonPositiveWidth { width: f32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::MissingParent => write!(f, "width depends on a missing parent"),
            LayoutError::TooDeep { depth } => {
                write!(f, "width resolution exceeded {depth} ancestors")
            }
            LayoutError::NonPositiveWidth { width } => {
                write!(f, "resolved width {width} is not positive")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Resolves the width of `probe`, falling back to its declared width and then
/// to ancestors when nothing is rendered.
pub fn resolve_width(probe: &dyn WidthProbe) -> Result<f32, LayoutError> {
    let width = resolve_at_depth(probe, 0)?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(LayoutError::NonPositiveWidth { width })
    }
}

fn resolve_at_depth(probe: &dyn WidthProbe, depth: usize) -> Result<f32, LayoutError> {
    if depth > MAX_PROBE_DEPTH {
        return Err(LayoutError::TooDeep {
            depth: MAX_PROBE_DEPTH,
        });
    }
    let rendered = probe.rendered_width();
    if rendered.is_finite() && rendered != 0.0 {
        return Ok(rendered);
    }
    match probe.declared_width() {
        DeclaredWidth::Px(width) => Ok(width),
        DeclaredWidth::Auto => {
            let parent = probe.parent().ok_or(LayoutError::MissingParent)?;
            resolve_at_depth(parent, depth + 1)
        }
        DeclaredWidth::Percent(percent) => {
            let parent = probe.parent().ok_or(LayoutError::MissingParent)?;
            Ok(resolve_at_depth(parent, depth + 1)? * percent / 100.0)
        }
    }
}

/// Measured geometry of a carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport_width: f32,
    pub page_width: f32,
    pub pages_per_view: usize,
    pub total_pages: usize,
}

impl Layout {
    pub fn new(
        viewport_width: f32,
        page_width: f32,
        total_pages: usize,
        rounding: PagesPerViewRounding,
    ) -> Self {
        let pages_per_view = if page_width.is_finite() && page_width > 0.0 {
            let ratio = rounding.apply(viewport_width / page_width);
            if ratio.is_finite() && ratio >= 1.0 {
                ratio as usize
            } else {
                1
            }
        } else {
            1
        };
        Self {
            viewport_width,
            page_width,
            pages_per_view,
            total_pages,
        }
    }

    /// Largest index at which the view is still full.
    pub fn max_index(&self) -> usize {
        self.total_pages.saturating_sub(self.pages_per_view)
    }

    /// Number of distinct resting indices.
    pub fn position_count(&self) -> usize {
        self.max_index() + 1
    }

    /// Viewport width left over after the last whole page.
    pub fn remainder(&self) -> f32 {
        if self.page_width > 0.0 && self.page_width.is_finite() {
            self.viewport_width % self.page_width
        } else {
            0.0
        }
    }

    pub fn clamp_index(&self, index: isize) -> usize {
        index.clamp(0, self.max_index() as isize) as usize
    }

    /// Wraps `index` onto the reachable positions, so one past the end is 0
    /// and -1 is `max_index`.
    pub fn wrap_index(&self, index: isize) -> usize {
        index.rem_euclid(self.position_count() as isize) as usize
    }

    pub fn resolve_index(&self, index: isize, continuous: bool) -> usize {
        if continuous {
            self.wrap_index(index)
        } else {
            self.clamp_index(index)
        }
    }
}

/// Measures `viewport` and `first_page` and derives the layout.
///
/// Unresolvable widths are logged and absorbed: an unmeasurable page takes the
/// viewport width, which leaves one page per view.
pub fn measure(
    viewport: &dyn WidthProbe,
    first_page: Option<&dyn WidthProbe>,
    total_pages: usize,
    rounding: PagesPerViewRounding,
) -> Layout {
    let viewport_width = match resolve_width(viewport) {
        Ok(width) => width,
        Err(err) => {
            log::warn!("viewport width unresolved, using 0: {err}");
            0.0
        }
    };
    let page_width = match first_page.map(resolve_width) {
        Some(Ok(width)) => width,
        Some(Err(err)) => {
            log::warn!("page width unresolved, using viewport width: {err}");
            viewport_width
        }
        None => viewport_width,
    };
    let layout = Layout::new(viewport_width, page_width, total_pages, rounding);
    log::debug!(
        "measured layout: viewport {} page {} x{} of {}",
        layout.viewport_width,
        layout.page_width,
        layout.pages_per_view,
        layout.total_pages
    );
    layout
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
