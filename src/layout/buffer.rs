//! The layout buffer: interprets input, queues wrapped lines, and paints them.

use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::event::{EVENT_LINE_PAINTED, LogLevel, emit_event, emit_log};
use crate::geometry::{Point, Rect};
use crate::layout::line::{Justify, Line};
use crate::layout::links::LinkMap;
use crate::layout::token::Tokens;
use crate::layout::wrap::Wrapper;
use crate::markup::{Environment, FunctionCallMode, Interpreter, MacroRegistry};
use crate::render::{FontRef, GlyphRenderer, ImageLoader, NullImageLoader};
use crate::widget::{TextFieldFactory, WidgetFactory, Widgets};

/// Layout buffer configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Fill color of the image and default text background.
    pub background: Rgba,
    /// Default text color.
    pub color: Rgba,
    /// Default font.
    pub font: FontRef,
    /// Extra pixels between painted lines.
    pub spacing: u32,
    /// Justification used when `input` is not given one.
    pub justify: Justify,
    /// Treatment of unknown function calls.
    pub function_calls: FunctionCallMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            color: Rgba::WHITE,
            font: FontRef::default(),
            spacing: 0,
            justify: Justify::Left,
            function_calls: FunctionCallMode::Lenient,
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontRef) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    #[must_use]
    pub fn function_calls(mut self, mode: FunctionCallMode) -> Self {
        self.function_calls = mode;
        self
    }

    /// The environment text starts in.
    #[must_use]
    pub fn environment(&self) -> Environment {
        Environment::new(self.background, self.color, self.font.clone())
    }
}

/// A fixed-size text area.
///
/// [`input`](Self::input) turns marked-up text into lines and queues them;
/// [`update`](Self::update) paints queued lines into [`image`](Self::image)
/// from the top down, as long as they fit. Painted link rectangles are kept
/// for hit-testing with [`get_collisions`](Self::get_collisions).
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use glyph_rust::{CellRenderer, LayoutBuffer, LayoutOptions, Point, Rect};
///
/// let mut layout = LayoutBuffer::new(
///     Rect::new(0, 0, 200, 100),
///     Rc::new(CellRenderer::new()),
///     LayoutOptions::default(),
/// )
/// .unwrap();
/// layout.input("see {link docs;the docs}", None).unwrap();
/// layout.update();
/// assert_eq!(layout.get_collisions(Point::new(30, 2)), Some("docs"));
/// ```
pub struct LayoutBuffer {
    rect: Rect,
    options: LayoutOptions,
    renderer: Rc<dyn GlyphRenderer>,
    images: Box<dyn ImageLoader>,
    macros: MacroRegistry,
    widgets: Widgets,
    image: Bitmap,
    cursor: u32,
    pending: VecDeque<Line>,
    links: LinkMap,
}

impl LayoutBuffer {
    /// Create a buffer covering `rect` of the surface it is drawn onto.
    ///
    /// `editor` environments get [`TextField`](crate::widget::TextField)s
    /// unless another factory is installed.
    pub fn new(
        rect: Rect,
        renderer: Rc<dyn GlyphRenderer>,
        options: LayoutOptions,
    ) -> Result<Self> {
        if rect.width == 0 {
            return Err(Error::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        let widgets = Widgets::with_factory(TextFieldFactory::new(Rc::clone(&renderer)));
        Ok(Self {
            rect,
            image: Bitmap::filled(rect.width, rect.height, options.background),
            options,
            renderer,
            images: Box::new(NullImageLoader),
            macros: MacroRegistry::new(),
            widgets,
            cursor: 0,
            pending: VecDeque::new(),
            links: LinkMap::new(),
        })
    }

    #[must_use]
    pub fn with_image_loader(mut self, images: impl ImageLoader + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    #[must_use]
    pub fn with_macros(mut self, macros: MacroRegistry) -> Self {
        self.macros = macros;
        self
    }

    pub fn macros_mut(&mut self) -> &mut MacroRegistry {
        &mut self.macros
    }

    pub fn set_widget_factory(&mut self, factory: impl WidgetFactory + 'static) {
        self.widgets.set_factory(factory);
    }

    /// Interpret, tokenize and wrap `text`, queueing the resulting lines.
    ///
    /// On error nothing is queued.
    pub fn input(&mut self, text: &str, justify: Option<Justify>) -> Result<()> {
        let justify = justify.unwrap_or(self.options.justify);
        let defaults = self.options.environment();
        let runs = Interpreter::new(
            &self.macros,
            self.images.as_ref(),
            &mut self.widgets,
            &defaults,
        )
        .mode(self.options.function_calls)
        .interpret(text)?;

        let tokens = Tokens::new(runs.into_iter(), self.renderer.as_ref());
        let lines = Wrapper::new(tokens, self.rect.width, justify).collect::<Result<Vec<_>>>()?;
        emit_log(
            LogLevel::Debug,
            &format!("queued {} line(s) from input", lines.len()),
        );
        self.pending.extend(lines);
        Ok(())
    }

    /// Paint queued lines while they fit, then draw placed widgets.
    ///
    /// A line that does not fit stays at the head of the queue.
    pub fn update(&mut self) {
        while let Some(line) = self.pending.front() {
            if self.cursor + line.height() > self.rect.height {
                break;
            }
            let Some(line) = self.pending.pop_front() else {
                break;
            };

            let y = self.cursor as i32;
            self.image.blit(line.bitmap(), 0, y);
            for (link, rects) in line.links().iter() {
                for rect in rects {
                    let rect = rect.translated(0, y);
                    self.links.push(link, rect);
                    self.widgets.set_rect(link, rect);
                }
            }
            emit_event(EVENT_LINE_PAINTED, &line.to_string());
            self.cursor += line.height() + self.options.spacing;
        }

        // A placement clipped by scrolling shows the bottom of the widget.
        for (rect, bitmap) in self.widgets.placed() {
            let top = bitmap.height().saturating_sub(rect.height) as i32;
            let area = Rect::new(0, top, rect.width, rect.height);
            self.image.blit_region(&bitmap, area, rect.x, rect.y);
        }
    }

    /// Reset the image and forget painted links, then repaint `background`
    /// over the area of `dest` this buffer covers.
    ///
    /// Queued lines are kept.
    pub fn clear(&mut self, dest: &mut Bitmap, background: &Bitmap) {
        self.image.fill(self.options.background);
        self.cursor = 0;
        self.links.clear();
        self.widgets.clear_rects();
        dest.copy_region(background, self.rect, self.rect.x, self.rect.y);
    }

    /// Scroll painted content up just far enough for the queued lines to fit,
    /// then [`update`](Self::update).
    ///
    /// Never scrolls past the painted content. Link and widget rectangles are
    /// clipped to the image; those scrolled off the top are dropped.
    pub fn scroll(&mut self) {
        let needed: u32 = self
            .pending
            .iter()
            .map(|line| line.height() + self.options.spacing)
            .sum();
        let amount = (self.cursor + needed)
            .saturating_sub(self.rect.height)
            .min(self.cursor);

        if amount > 0 {
            let dy = -(amount as i32);
            self.image.scroll_up(amount, self.options.background);
            self.cursor -= amount;
            let bounds = Rect::sized(self.rect.width, self.rect.height);
            self.links.map_rects(|rect| {
                rect.translated(0, dy)
                    .intersect(&bounds)
                    .unwrap_or_default()
            });
            self.links.retain_rects(|rect| !rect.is_empty());
            self.widgets.scroll(dy, bounds);
        }
        self.update();
    }

    /// The link under `point`, given in the coordinates of the surface
    /// `rect` is placed on.
    #[must_use]
    pub fn get_collisions(&self, point: Point) -> Option<&str> {
        self.links
            .hit(Point::new(
                point.x.saturating_sub(self.rect.x),
                point.y.saturating_sub(self.rect.y),
            ))
    }

    #[must_use]
    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lines waiting to be painted.
    #[must_use]
    pub fn pending_lines(&self) -> impl ExactSizeIterator<Item = &Line> {
        self.pending.iter()
    }

    /// Painted link rectangles in image coordinates.
    #[must_use]
    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    #[must_use]
    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }
}

/// Named layout buffers hit-tested together.
#[derive(Default)]
pub struct LayoutGroup {
    buffers: IndexMap<String, LayoutBuffer>,
}

impl LayoutGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buffer, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, buffer: LayoutBuffer) -> Option<LayoutBuffer> {
        self.buffers.insert(name.into(), buffer)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LayoutBuffer> {
        self.buffers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LayoutBuffer> {
        self.buffers.get_mut(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Paint queued lines of every buffer.
    pub fn update(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.update();
        }
    }

    /// `(buffer name, link id)` of the first buffer with a link at `point`.
    #[must_use]
    pub fn get_collisions(&self, point: Point) -> Option<(&str, &str)> {
        self.buffers.iter().find_map(|(name, buffer)| {
            buffer
                .get_collisions(point)
                .map(|link| (name.as_str(), link))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CellRenderer, MemoryImageLoader};

    // CellRenderer with the default 8px font: 4px cells, 8px lines.
    fn buffer(width: u32, height: u32) -> LayoutBuffer {
        buffer_at(Rect::sized(width, height), LayoutOptions::default())
    }

    fn buffer_at(rect: Rect, options: LayoutOptions) -> LayoutBuffer {
        LayoutBuffer::new(rect, Rc::new(CellRenderer::new()), options).unwrap()
    }

    fn pending(layout: &LayoutBuffer) -> Vec<String> {
        layout.pending_lines().map(ToString::to_string).collect()
    }

    // ============================================
    // Construction
    // ============================================

    #[test]
    fn test_zero_width_rejected() {
        let result = LayoutBuffer::new(
            Rect::sized(0, 10),
            Rc::new(CellRenderer::new()),
            LayoutOptions::default(),
        );
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_image_starts_with_background() {
        let layout = buffer_at(
            Rect::sized(8, 4),
            LayoutOptions::default().background(Rgba::BLUE),
        );
        assert_eq!(layout.image().get(7, 3), Some(Rgba::BLUE));
    }

    #[test]
    fn test_options_builder() {
        let options = LayoutOptions::default()
            .color(Rgba::RED)
            .font(FontRef::new("serif", 12))
            .spacing(3)
            .justify(Justify::Center)
            .function_calls(FunctionCallMode::Strict);
        assert_eq!(options.spacing, 3);
        assert_eq!(options.environment().font, FontRef::new("serif", 12));
        assert_eq!(options.environment().link, None);
    }

    // ============================================
    // Input and painting
    // ============================================

    #[test]
    fn test_input_queues_lines() {
        let mut layout = buffer(12, 100);
        layout.input("ab cd ef", None).unwrap();
        assert_eq!(pending(&layout), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_failed_input_queues_nothing() {
        let mut layout = buffer(12, 100);
        layout.input("ab", None).unwrap();
        assert!(layout.input("ok {nope;x}", None).is_err());
        assert!(layout.input("ok muchtoolong", None).is_err());
        assert_eq!(pending(&layout), vec!["ab"]);
    }

    #[test]
    fn test_update_paints_and_keeps_overflow() {
        let mut layout = buffer(12, 20);
        layout.input("ab cd ef", None).unwrap();
        layout.update();
        // Two 8px lines fit in 20px; the third waits.
        assert_eq!(pending(&layout), vec!["ef"]);
        assert_eq!(layout.image().get(0, 1), Some(Rgba::WHITE));
        assert_eq!(layout.image().get(0, 9), Some(Rgba::WHITE));
        assert_eq!(layout.image().get(0, 17), Some(Rgba::BLACK));
    }

    #[test]
    fn test_spacing_between_lines() {
        let mut layout = buffer_at(Rect::sized(12, 40), LayoutOptions::default().spacing(2));
        layout.input("{link a;ab} {link b;cd}", None).unwrap();
        layout.update();
        assert_eq!(layout.links().get("a"), Some(&[Rect::new(0, 0, 8, 8)][..]));
        assert_eq!(layout.links().get("b"), Some(&[Rect::new(0, 10, 8, 8)][..]));
    }

    #[test]
    fn test_default_justify_from_options() {
        let mut layout = buffer_at(
            Rect::sized(20, 40),
            LayoutOptions::default().justify(Justify::Right),
        );
        layout.input("{link a;ab}", None).unwrap();
        layout.input("{link b;ab}", Some(Justify::Left)).unwrap();
        layout.update();
        assert_eq!(layout.links().get("a"), Some(&[Rect::new(12, 0, 8, 8)][..]));
        assert_eq!(layout.links().get("b"), Some(&[Rect::new(0, 8, 8, 8)][..]));
    }

    #[test]
    fn test_image_function_with_loader() {
        let images = MemoryImageLoader::new().with_image("sq", Bitmap::filled(6, 6, Rgba::RED));
        let mut layout = buffer(40, 20).with_image_loader(images);
        layout.input("/img{sq}", None).unwrap();
        layout.update();
        assert_eq!(layout.image().get(5, 5), Some(Rgba::RED));
    }

    // ============================================
    // Hit-testing
    // ============================================

    #[test]
    fn test_collisions_offset_by_rect_origin() {
        let mut layout = buffer_at(Rect::new(100, 50, 40, 20), LayoutOptions::default());
        layout.input("go {link next;next}", None).unwrap();
        layout.update();
        assert_eq!(layout.get_collisions(Point::new(113, 52)), Some("next"));
        assert_eq!(layout.get_collisions(Point::new(13, 2)), None);
        assert_eq!(layout.get_collisions(Point::new(101, 52)), None);
    }

    #[test]
    fn test_group_collisions() {
        let mut left = buffer_at(Rect::new(0, 0, 40, 20), LayoutOptions::default());
        left.input("{link l;left}", None).unwrap();
        let mut right = buffer_at(Rect::new(40, 0, 40, 20), LayoutOptions::default());
        right.input("{link r;right}", None).unwrap();

        let mut group = LayoutGroup::new();
        group.insert("left", left);
        group.insert("right", right);
        group.update();

        assert_eq!(group.get_collisions(Point::new(2, 2)), Some(("left", "l")));
        assert_eq!(group.get_collisions(Point::new(42, 2)), Some(("right", "r")));
        assert_eq!(group.get_collisions(Point::new(2, 15)), None);
        assert_eq!(group.len(), 2);
    }

    // ============================================
    // Clear and scroll
    // ============================================

    #[test]
    fn test_clear_resets_state() {
        let mut layout = buffer_at(Rect::new(2, 2, 20, 8), LayoutOptions::default());
        layout.input("{link a;ab}", None).unwrap();
        layout.update();

        let mut dest = Bitmap::filled(30, 30, Rgba::WHITE);
        let background = Bitmap::filled(30, 30, Rgba::GREEN);
        layout.clear(&mut dest, &background);

        assert!(layout.links().is_empty());
        assert_eq!(layout.image().get(0, 1), Some(Rgba::BLACK));
        assert_eq!(dest.get(2, 2), Some(Rgba::GREEN));
        assert_eq!(dest.get(21, 9), Some(Rgba::GREEN));
        assert_eq!(dest.get(22, 2), Some(Rgba::WHITE));
        assert_eq!(dest.get(1, 1), Some(Rgba::WHITE));

        layout.input("{link b;cd}", None).unwrap();
        layout.update();
        assert_eq!(layout.links().get("b"), Some(&[Rect::new(0, 0, 8, 8)][..]));
    }

    #[test]
    fn test_scroll_makes_room() {
        let mut layout = buffer(12, 16);
        layout.input("{link a;ab} {link b;cd} {link c;ef}", None).unwrap();
        layout.update();
        assert_eq!(layout.pending_lines().len(), 1);

        layout.scroll();
        assert_eq!(layout.pending_lines().len(), 0);
        assert!(layout.links().get("a").is_none());
        assert_eq!(layout.links().get("b"), Some(&[Rect::new(0, 0, 8, 8)][..]));
        assert_eq!(layout.links().get("c"), Some(&[Rect::new(0, 8, 8, 8)][..]));
    }

    #[test]
    fn test_scroll_clips_partially_hidden_links() {
        // 12px tall: "ab" at 0..8, "cd" waits; scrolling by 4 leaves half of "ab".
        let mut layout = buffer_at(Rect::new(0, 20, 12, 12), LayoutOptions::default());
        layout.input("{link a;ab} {link b;cd}", None).unwrap();
        layout.update();
        layout.scroll();

        assert_eq!(layout.links().get("a"), Some(&[Rect::new(0, 0, 8, 4)][..]));
        assert_eq!(layout.links().get("b"), Some(&[Rect::new(0, 4, 8, 8)][..]));
        assert_eq!(layout.get_collisions(Point::new(2, 18)), None);
        assert_eq!(layout.get_collisions(Point::new(2, 21)), Some("a"));
        for (_, rects) in layout.links().iter() {
            for rect in rects {
                assert!(Rect::sized(12, 12).contains_rect(rect));
            }
        }
    }

    #[test]
    fn test_scroll_clips_widget_placement() {
        // The 20px field fills the first line; "zz" wraps and needs 4px more.
        let mut layout = buffer_at(Rect::sized(24, 12), LayoutOptions::default());
        layout.input("{editor w,20;x} zz", None).unwrap();
        layout.update();
        assert_eq!(layout.widgets().rect("w"), Some(Rect::new(0, 0, 20, 8)));

        layout.scroll();
        assert_eq!(layout.widgets().rect("w"), Some(Rect::new(0, 0, 20, 4)));
    }

    #[test]
    fn test_collisions_with_extreme_points() {
        let mut layout = buffer_at(Rect::new(100, 50, 40, 20), LayoutOptions::default());
        layout.input("{link a;ab}", None).unwrap();
        layout.update();
        assert_eq!(layout.get_collisions(Point::new(i32::MIN, i32::MIN)), None);
        assert_eq!(layout.get_collisions(Point::new(i32::MAX, i32::MAX)), None);
    }

    #[test]
    fn test_scroll_without_need_only_updates() {
        let mut layout = buffer(12, 40);
        layout.input("{link a;ab}", None).unwrap();
        layout.scroll();
        assert_eq!(layout.links().get("a"), Some(&[Rect::new(0, 0, 8, 8)][..]));
    }

    // ============================================
    // Widgets
    // ============================================

    #[test]
    fn test_editor_is_placed_and_drawn() {
        let mut layout = buffer_at(
            Rect::sized(60, 20),
            LayoutOptions::default().background(Rgba::BLUE),
        );
        layout.input("name: {editor who,20;Bo}", None).unwrap();
        layout.update();

        let rect = layout.widgets().rect("who");
        assert_eq!(rect, Some(Rect::new(24, 0, 20, 8)));
        assert_eq!(layout.get_collisions(Point::new(30, 4)), Some("who"));
        assert_eq!(layout.image().get(25, 4), Some(Rgba::WHITE));

        let field = layout.widgets().get("who");
        assert!(field.is_some());
    }

    #[test]
    fn test_custom_widget_factory() {
        struct Plain;
        impl crate::widget::Widget for Plain {
            fn input(&mut self, _key: crate::input::KeyEvent) {}
            fn current_bitmap(&self) -> Bitmap {
                Bitmap::filled(3, 3, Rgba::RED)
            }
        }
        struct PlainFactory;
        impl WidgetFactory for PlainFactory {
            fn create(&self, _: &str, _: u32, _: &Environment) -> Box<dyn crate::widget::Widget> {
                Box::new(Plain)
            }
        }

        let mut layout = buffer(40, 20);
        layout.set_widget_factory(PlainFactory);
        layout.input("{editor w,10;}", None).unwrap();
        layout.update();
        assert_eq!(layout.widgets().rect("w"), Some(Rect::new(0, 0, 3, 3)));
        assert_eq!(layout.image().get(1, 1), Some(Rgba::RED));
    }
}
