//! The sample screen and a surface that paints it.

use lwuit::{
    BorderLayout, BorderRegion, Color, Component, ComponentId, Container, FlowLayout, Graphics,
    HAlign, Insets, LayoutChild, LayoutError, Point, Rect, Surface, TableConstraint, TableLayout,
    ToolkitConfig,
};

/// Title bar, a two-column table of labeled fields, and a button row.
pub struct SampleForm {
    pub root: Container,
    pub submit: ComponentId,
}

impl SampleForm {
    pub fn new(title: &str, fields: &[&str], config: &ToolkitConfig) -> Result<Self, LayoutError> {
        let mut root = Container::with_config(BorderLayout::new(), config)
            .named(title)
            .padding(Insets::all(4));
        root.add_with(BorderRegion::North, Component::sized(120, 24).named("title"))?;

        let rows = fields.len().max(1);
        let table = TableLayout::new(rows, 2)?.with_defaults(&config.table);
        let mut body = Container::with_config(table, config)
            .named("body")
            .padding(Insets::symmetric(0, 8));
        for (row, name) in fields.iter().enumerate() {
            let label = TableConstraint::at(row, 0).align(HAlign::Right);
            body.add_with(label, Component::sized(60, 20).named(format!("{name} label")))?;
            let field = Component::sized(120, 20)
                .named(*name)
                .margin(Insets::symmetric(4, 2));
            body.add_with(TableConstraint::at(row, 1), field)?;
        }
        root.add_with(BorderRegion::Center, body)?;

        let mut buttons = Container::with_config(FlowLayout::with_align(HAlign::Right), config)
            .named("buttons");
        buttons.add(Component::sized(60, 28).named("cancel").margin(Insets::all(2)))?;
        let submit = buttons.add(Component::sized(60, 28).named("submit").margin(Insets::all(2)))?;
        root.add_with(BorderRegion::South, buttons)?;

        Ok(Self { root, submit })
    }

    pub fn layout(&mut self, bounds: Rect) {
        self.root.set_bounds(bounds);
        self.root.layout_container();
    }

    /// Log the absolute bounds of every component.
    pub fn log_geometry(&self) {
        log_children(&self.root, self.root.bounds().origin(), 0);
    }

    pub fn into_surface(self, background: Color, native_alpha: bool) -> FormSurface {
        FormSurface {
            root: self.root,
            background,
            native_alpha,
        }
    }
}

fn log_children(container: &Container, origin: Point, depth: usize) {
    for child in container.children() {
        let b = child.bounds().translate(origin);
        let name = child.name().unwrap_or("-");
        tracing::info!(depth, name, x = b.x, y = b.y, width = b.width, height = b.height, "bounds");
        if let LayoutChild::Container(nested) = child {
            log_children(nested, b.origin(), depth + 1);
        }
    }
}

/// Paints containers as tinted panels and components as dark blocks.
pub struct FormSurface {
    root: Container,
    background: Color,
    native_alpha: bool,
}

const PANEL: Color = Color::rgba(0, 0, 0, 24);
const BLOCK: Color = Color::rgb(48, 48, 64);

impl FormSurface {
    fn paint_children(&self, g: &mut Graphics<'_>, container: &Container) {
        for child in container.children() {
            let b = child.bounds();
            match child {
                LayoutChild::Component(_) => g.fill_rect(b, BLOCK),
                LayoutChild::Container(nested) => {
                    g.fill_rect(b, PANEL);
                    let state = g.save();
                    g.translate(b.x, b.y);
                    g.clip_rect(Rect::new(0, 0, b.width, b.height));
                    self.paint_children(g, nested);
                    g.restore(state);
                }
            }
        }
    }
}

impl Surface for FormSurface {
    fn bounds(&self) -> Rect {
        self.root.bounds()
    }

    fn paint(&self, g: &mut Graphics<'_>) {
        let b = self.root.bounds();
        g.fill_rect(b, self.background);
        let state = g.save();
        g.translate(b.x, b.y);
        self.paint_children(g, &self.root);
        g.restore(state);
    }

    fn native_alpha(&self) -> bool {
        self.native_alpha
    }
}
