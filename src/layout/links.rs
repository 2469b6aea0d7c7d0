//! Link rectangles keyed by link id.

use indexmap::IndexMap;

use crate::geometry::{Point, Rect};

/// Rectangles covered by each link id, in the order ids were first seen.
///
/// Hit-testing walks ids in that order, so the first id inserted wins when
/// rectangles overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkMap {
    rects: IndexMap<String, Vec<Rect>>,
}

impl LinkMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, link: &str, rect: Rect) {
        match self.rects.get_mut(link) {
            Some(rects) => rects.push(rect),
            None => {
                self.rects.insert(link.to_string(), vec![rect]);
            }
        }
    }

    /// Add every rectangle of `other`, moved by `(dx, dy)`.
    pub fn extend_translated(&mut self, other: &LinkMap, dx: i32, dy: i32) {
        for (link, rects) in other.iter() {
            for rect in rects {
                self.push(link, rect.translated(dx, dy));
            }
        }
    }

    #[must_use]
    pub fn get(&self, link: &str) -> Option<&[Rect]> {
        self.rects.get(link).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rect])> {
        self.rects
            .iter()
            .map(|(link, rects)| (link.as_str(), rects.as_slice()))
    }

    /// Apply `f` to every rectangle.
    pub fn map_rects(&mut self, mut f: impl FnMut(Rect) -> Rect) {
        for rect in self.rects.values_mut().flatten() {
            *rect = f(*rect);
        }
    }

    /// Keep only rectangles matching `keep`. Ids left without rectangles are
    /// removed.
    pub fn retain_rects(&mut self, mut keep: impl FnMut(&Rect) -> bool) {
        for rects in self.rects.values_mut() {
            rects.retain(&mut keep);
        }
        self.rects.retain(|_, rects| !rects.is_empty());
    }

    /// First link id, in insertion order, with a rectangle containing `point`.
    #[must_use]
    pub fn hit(&self, point: Point) -> Option<&str> {
        self.iter()
            .find(|(_, rects)| rects.iter().any(|rect| rect.contains(point)))
            .map(|(link, _)| link)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}
