use log::{debug, warn};

use crate::config::AnnotationConfig;
use crate::geometry::{BoundingBox, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    /// Drawn by dragging from one corner to the opposite one.
    Dragged(BoundingBox),
    /// A square of the session's current size placed by a single click.
    Square { top_left: Point, size: f64 },
}

impl Mark {
    fn bbox(&self) -> BoundingBox {
        match *self {
            Mark::Dragged(b) => b,
            Mark::Square { top_left, size } => {
                BoundingBox::from_origin_size(top_left, size, size)
            }
        }
    }
}

/// The positive boxes marked on one image, in the order they were drawn.
///
/// Holds only geometry, the widget layer forwards its press/release and key
/// events here and redraws from [`boxes`](Self::boxes).
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    config: AnnotationConfig,
    rect_size: f64,
    marks: Vec<Mark>,
}

impl AnnotationSession {
    pub fn new(config: AnnotationConfig) -> Self {
        Self {
            rect_size: config.initial_rect_size,
            config,
            marks: Vec::new(),
        }
    }

    /// Add the box spanned by a press and a release position.
    ///
    /// Returns `None` and keeps nothing if the drag is narrower or shorter than `min_span`.
    pub fn add_drag(
        &mut self,
        press: impl Into<Point>,
        release: impl Into<Point>,
    ) -> Option<BoundingBox> {
        let b = BoundingBox::new(press, release);
        if b.width() < self.config.min_span || b.height() < self.config.min_span {
            debug!("ignoring drag below minimum span: {}", b);
            return None;
        }
        self.marks.push(Mark::Dragged(b));
        Some(b)
    }

    /// Add a square of the current size around a click position.
    pub fn add_centered(&mut self, click: impl Into<Point>) -> BoundingBox {
        let click = click.into();
        let shift = (self.rect_size / 2.).floor();
        let mark = Mark::Square {
            top_left: Point::new(click.x() - shift, click.y() - shift),
            size: self.rect_size,
        };
        self.marks.push(mark);
        mark.bbox()
    }

    /// Edge length used by the next [`add_centered`](Self::add_centered).
    pub fn rect_size(&self) -> f64 {
        self.rect_size
    }

    /// Enlarge the click square, resizing the last square in place.
    pub fn grow(&mut self) {
        self.set_rect_size(self.rect_size + self.config.rect_size_step);
    }

    /// Shrink the click square, resizing the last square in place. Never goes below one step.
    pub fn shrink(&mut self) {
        let step = self.config.rect_size_step;
        self.set_rect_size(f64::max(step, self.rect_size - step));
    }

    fn set_rect_size(&mut self, size: f64) {
        self.rect_size = size;
        // the last square keeps its top-left corner
        if let Some(Mark::Square { size: last, .. }) = self.marks.last_mut() {
            *last = size;
        }
    }

    /// Remove the most recent box.
    pub fn undo(&mut self) -> Option<BoundingBox> {
        match self.marks.pop() {
            Some(mark) => Some(mark.bbox()),
            None => {
                warn!("nothing to undo, no boxes marked");
                None
            }
        }
    }

    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.marks.iter().map(Mark::bbox).collect()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new(AnnotationConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn drag_normalizes_and_filters_small_boxes() {
        let mut session = AnnotationSession::default();
        let b = session.add_drag((40, 50), (10, 20)).unwrap();
        assert_eq!(b, BoundingBox::new((10, 20), (40, 50)));

        assert_eq!(session.add_drag((0, 0), (4, 100)), None);
        assert_eq!(session.add_drag((0, 0), (100, 4.5)), None);
        assert!(session.add_drag((0, 0), (5, 5)).is_some());
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn centered_square() {
        let mut session = AnnotationSession::new(AnnotationConfig {
            initial_rect_size: 60.,
            ..AnnotationConfig::default()
        });
        let b = session.add_centered((100, 100));
        assert_eq!(b, BoundingBox::new((70, 70), (130, 130)));

        session.shrink();
        assert_eq!(session.rect_size(), 58.);
        let b = session.add_centered((100.5, 100));
        assert_eq!(b.top_left(), Point::new(71.5, 71));
        assert_eq!(b.size(), (58., 58.));
    }

    #[test]
    fn resizing_keeps_last_square_origin() {
        let mut session = AnnotationSession::default();
        session.add_centered((100, 100));
        session.grow();
        session.grow();
        assert_eq!(session.rect_size(), 84.);
        assert_eq!(session.boxes(), vec![BoundingBox::new((60, 60), (144, 144))]);

        // dragged boxes are not touched
        session.add_drag((0, 0), (10, 10));
        session.shrink();
        assert_eq!(session.boxes()[1], BoundingBox::new((0, 0), (10, 10)));
        assert_eq!(session.boxes()[0].width(), 84.);
    }

    #[test]
    fn shrink_stops_at_one_step() {
        let mut session = AnnotationSession::new(AnnotationConfig {
            initial_rect_size: 4.,
            ..AnnotationConfig::default()
        });
        for _ in 0..5 {
            session.shrink();
        }
        assert_eq!(session.rect_size(), 2.);
    }

    #[test]
    fn undo_in_reverse_order() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = AnnotationSession::default();
        let first = session.add_drag((0, 0), (10, 10)).unwrap();
        let second = session.add_centered((50, 50));

        assert_eq!(session.undo(), Some(second));
        assert_eq!(session.undo(), Some(first));
        assert_eq!(session.undo(), None);
        assert!(session.is_empty());

        session.add_centered((5, 5));
        session.clear();
        assert!(session.boxes().is_empty());
    }
}
