//! Embedded widgets.
//!
//! An `{editor name,width;...}` environment creates a widget through the
//! registered [`WidgetFactory`] and links the environment to it. Text written
//! inside is typed into the widget instead of being laid out, and the widget's
//! current bitmap takes its place in the line.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::geometry::Rect;
use crate::input::{KeyCode, KeyEvent};
use crate::markup::Environment;
use crate::render::GlyphRenderer;

/// An interactive element embedded in laid-out text.
pub trait Widget {
    fn input(&mut self, key: KeyEvent);

    /// Snapshot of the widget's current appearance.
    fn current_bitmap(&self) -> Bitmap;
}

/// Creates widgets for `editor` environments.
pub trait WidgetFactory {
    /// `env` is the environment the `editor` directive appeared in.
    fn create(&self, name: &str, width: u32, env: &Environment) -> Box<dyn Widget>;
}

struct Slot {
    widget: Box<dyn Widget>,
    rect: Option<Rect>,
}

/// Widgets keyed by link id, in creation order.
#[derive(Default)]
pub struct Widgets {
    factory: Option<Box<dyn WidgetFactory>>,
    slots: IndexMap<String, Slot>,
}

impl fmt::Debug for Widgets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widgets")
            .field("has_factory", &self.factory.is_some())
            .field("names", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Widgets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_factory(factory: impl WidgetFactory + 'static) -> Self {
        let mut widgets = Self::new();
        widgets.set_factory(factory);
        widgets
    }

    pub fn set_factory(&mut self, factory: impl WidgetFactory + 'static) {
        self.factory = Some(Box::new(factory));
    }

    /// Create a widget and register it under `name`, replacing any widget
    /// already registered there.
    pub fn create(&mut self, name: &str, width: u32, env: &Environment) -> Result<()> {
        let factory = self.factory.as_ref().ok_or_else(|| Error::MarkupSyntax {
            name: "editor".to_string(),
        })?;
        let widget = factory.create(name, width, env);
        self.slots
            .insert(name.to_string(), Slot { widget, rect: None });
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Send a key to the named widget. Returns false if there is none.
    pub fn deliver(&mut self, name: &str, key: KeyEvent) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) => {
                slot.widget.input(key);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn bitmap(&self, name: &str) -> Option<Bitmap> {
        self.slots.get(name).map(|slot| slot.widget.current_bitmap())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.slots.get(name).map(|slot| slot.widget.as_ref())
    }

    /// Where the named widget was last painted.
    #[must_use]
    pub fn rect(&self, name: &str) -> Option<Rect> {
        self.slots.get(name).and_then(|slot| slot.rect)
    }

    pub fn set_rect(&mut self, name: &str, rect: Rect) {
        if let Some(slot) = self.slots.get_mut(name) {
            slot.rect = Some(rect);
        }
    }

    /// Move every placed widget vertically and clip it to `bounds`.
    ///
    /// Widgets moved entirely outside `bounds` lose their placement.
    pub fn scroll(&mut self, dy: i32, bounds: Rect) {
        for slot in self.slots.values_mut() {
            slot.rect = slot
                .rect
                .and_then(|rect| rect.translated(0, dy).intersect(&bounds));
        }
    }

    /// Forget all placements.
    pub fn clear_rects(&mut self) {
        for slot in self.slots.values_mut() {
            slot.rect = None;
        }
    }

    /// Placed widgets with their current bitmaps.
    pub fn placed(&self) -> impl Iterator<Item = (Rect, Bitmap)> + '_ {
        self.slots
            .values()
            .filter_map(|slot| slot.rect.map(|rect| (rect, slot.widget.current_bitmap())))
    }
}

/// A single-line text entry.
///
/// The field is `width` pixels wide and one line of the environment's font
/// tall. When the text outgrows the field its tail stays visible.
pub struct TextField {
    renderer: Rc<dyn GlyphRenderer>,
    env: Environment,
    width: u32,
    height: u32,
    text: String,
}

impl TextField {
    pub fn new(renderer: Rc<dyn GlyphRenderer>, width: u32, env: Environment) -> Self {
        let height = renderer.line_height(&env.font);
        Self {
            renderer,
            env,
            width,
            height,
            text: String::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for TextField {
    fn input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Enter => {}
            KeyCode::Tab => self.text.push(' '),
            KeyCode::Char(c) => self.text.push(c),
        }
    }

    fn current_bitmap(&self) -> Bitmap {
        let mut out = Bitmap::filled(self.width, self.height, self.env.background);
        match self.renderer.render(
            &self.text,
            &self.env.font,
            self.env.color,
            self.env.background,
        ) {
            Ok(text) => {
                let overflow = i64::from(text.width()) - i64::from(self.width);
                let x = i32::try_from(-overflow.max(0)).unwrap_or(i32::MIN);
                out.blit(&text, x, 0);
            }
            Err(err) => emit_log(LogLevel::Warn, &format!("text field render failed: {err}")),
        }
        out
    }
}

/// Creates a [`TextField`] for every `editor` environment.
pub struct TextFieldFactory {
    renderer: Rc<dyn GlyphRenderer>,
}

impl TextFieldFactory {
    pub fn new(renderer: Rc<dyn GlyphRenderer>) -> Self {
        Self { renderer }
    }
}

impl WidgetFactory for TextFieldFactory {
    fn create(&self, _name: &str, width: u32, env: &Environment) -> Box<dyn Widget> {
        Box::new(TextField::new(Rc::clone(&self.renderer), width, env.clone()))
    }
}
