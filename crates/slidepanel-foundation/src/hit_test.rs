//! Region classification for pointer-down routing.
//!
//! The host performs geometric hit-testing and hands back the tags of every
//! region under the pointer, innermost first. [`classify`] reduces that path
//! to a single [`HitClass`] which is held for the whole gesture.

use slidepanel_core::{Point, Rect};
use smallvec::SmallVec;

/// Tag attached to a rendered region that participates in gesture routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RegionTag {
    /// Region with no routing preference.
    #[default]
    Plain,
    /// Drags always move the panel, even over scrollable content.
    ForceDraggable,
    /// Nested horizontal control that owns horizontal drags.
    HorizontalScrollable,
    /// Region that opts out of panel dragging entirely.
    IgnoreDraggable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HitClass {
    #[default]
    Normal,
    ForceDraggable,
    HorizontalScrollable,
    IgnoreDraggable,
}

impl HitClass {
    pub fn is_ignore_draggable(self) -> bool {
        matches!(self, HitClass::IgnoreDraggable)
    }
}

/// Hit-test result ordered innermost first.
pub type HitPath = SmallVec<[RegionTag; 8]>;

/// First non-plain tag wins; an all-plain or empty path is `Normal`.
pub fn classify(path: &[RegionTag]) -> HitClass {
    path.iter()
        .find_map(|tag| match tag {
            RegionTag::Plain => None,
            RegionTag::ForceDraggable => Some(HitClass::ForceDraggable),
            RegionTag::HorizontalScrollable => Some(HitClass::HorizontalScrollable),
            RegionTag::IgnoreDraggable => Some(HitClass::IgnoreDraggable),
        })
        .unwrap_or_default()
}

/// Geometric hit-testing capability provided by the host.
pub trait HitTester {
    fn hit_test(&self, position: Point) -> HitPath;

    fn classify_at(&self, position: Point) -> HitClass {
        classify(&self.hit_test(position))
    }
}

impl<F> HitTester for F
where
    F: Fn(Point) -> HitPath,
{
    fn hit_test(&self, position: Point) -> HitPath {
        self(position)
    }
}

#[derive(Clone, Copy, Debug)]
struct Region {
    rect: Rect,
    depth: u32,
    tag: RegionTag,
}

/// Flat list of tagged rectangles standing in for a rendered tree.
///
/// `depth` is the nesting level of the region; deeper regions are reported
/// first. Regions at equal depth keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct RegionMap {
    regions: Vec<Region>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rect: Rect, depth: u32, tag: RegionTag) {
        self.regions.push(Region { rect, depth, tag });
    }

    pub fn with_region(mut self, rect: Rect, depth: u32, tag: RegionTag) -> Self {
        self.insert(rect, depth, tag);
        self
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

impl HitTester for RegionMap {
    fn hit_test(&self, position: Point) -> HitPath {
        let mut hits: SmallVec<[&Region; 8]> = self
            .regions
            .iter()
            .filter(|region| region.rect.contains(position))
            .collect();
        // Stable sort keeps insertion order among siblings.
        hits.sort_by(|a, b| b.depth.cmp(&a.depth));
        hits.into_iter().map(|region| region.tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_normal() {
        assert_eq!(classify(&[]), HitClass::Normal);
        assert_eq!(classify(&[RegionTag::Plain, RegionTag::Plain]), HitClass::Normal);
    }

    #[test]
    fn innermost_tag_wins() {
        let path = [
            RegionTag::Plain,
            RegionTag::HorizontalScrollable,
            RegionTag::IgnoreDraggable,
        ];
        assert_eq!(classify(&path), HitClass::HorizontalScrollable);
    }

    #[test]
    fn region_map_reports_deepest_first() {
        let map = RegionMap::new()
            .with_region(Rect::new(0.0, 0.0, 400.0, 500.0), 0, RegionTag::Plain)
            .with_region(
                Rect::new(0.0, 0.0, 400.0, 200.0),
                1,
                RegionTag::ForceDraggable,
            )
            .with_region(
                Rect::new(0.0, 50.0, 400.0, 60.0),
                2,
                RegionTag::HorizontalScrollable,
            );

        let path = map.hit_test(Point::new(10.0, 60.0));
        assert_eq!(
            path.as_slice(),
            &[
                RegionTag::HorizontalScrollable,
                RegionTag::ForceDraggable,
                RegionTag::Plain
            ]
        );
        assert_eq!(map.classify_at(Point::new(10.0, 60.0)), HitClass::HorizontalScrollable);
        assert_eq!(map.classify_at(Point::new(10.0, 150.0)), HitClass::ForceDraggable);
        assert_eq!(map.classify_at(Point::new(10.0, 300.0)), HitClass::Normal);
        assert_eq!(map.classify_at(Point::new(900.0, 900.0)), HitClass::Normal);
    }

    #[test]
    fn closures_act_as_hit_testers() {
        let tester = |position: Point| -> HitPath {
            let mut path = HitPath::new();
            if position.y < 10.0 {
                path.push(RegionTag::IgnoreDraggable);
            }
            path
        };
        assert!(tester.classify_at(Point::new(0.0, 5.0)).is_ignore_draggable());
        assert_eq!(tester.classify_at(Point::new(0.0, 50.0)), HitClass::Normal);
    }
}
