//! Terminal control panel: folders of sliders, toggles, and buttons bound to
//! settings fields.
//!
//! Widgets never hold settings state of their own beyond the value they
//! currently display. Edits write through the field reference after
//! clamping to the widget's range, so out-of-range values never reach the
//! settings record. After a programmatic change to the settings the owner
//! calls [`ControlPanel::refresh_displayed_value`].

use crate::state::{Field, FieldValue, Settings};

/// Handle to a widget in a [`ControlPanel`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetId(usize);

/// Handle to a folder in a [`ControlPanel`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

/// Numeric range of a slider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Round values to whole numbers
    pub integer: bool,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        SliderRange {
            min,
            max,
            step,
            integer: false,
        }
    }

    pub const fn integer(min: f64, max: f64) -> Self {
        SliderRange {
            min,
            max,
            step: 1.0,
            integer: true,
        }
    }

    /// Clamps `value` into the range, rounding when the slider is integral
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let value = if self.integer { value.round() } else { value };
        value.clamp(self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum WidgetKind {
    Slider { field: Field, range: SliderRange },
    Toggle { field: Field },
    Button,
}

/// User action on a widget
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidgetEdit {
    /// Move a slider by a number of steps
    Step(i32),
    /// Set a slider to a value
    Set(f64),
    /// Flip a toggle
    Toggle,
    /// Press a button
    Press,
}

/// Result of an edit that was applied
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditOutcome<H> {
    /// Field written, if the widget is bound to one
    pub field: Option<Field>,
    /// Hook registered with [`ControlPanel::on_change`]
    pub hook: Option<H>,
}

#[derive(Clone, Debug)]
struct Widget<H> {
    folder: FolderId,
    label: &'static str,
    kind: WidgetKind,
    displayed: Option<FieldValue>,
    hook: Option<H>,
}

/// One rendered line of the panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    pub selected: bool,
    pub header: bool,
}

/// Container of widgets grouped in folders
#[derive(Clone, Debug)]
pub struct ControlPanel<H> {
    title: &'static str,
    folders: Vec<&'static str>,
    widgets: Vec<Widget<H>>,
    selected: usize,
}

impl<H: Copy> ControlPanel<H> {
    pub fn new(title: &'static str) -> Self {
        ControlPanel {
            title,
            folders: Vec::new(),
            widgets: Vec::new(),
            selected: 0,
        }
    }

    pub fn add_folder(&mut self, name: &'static str) -> FolderId {
        self.folders.push(name);
        FolderId(self.folders.len() - 1)
    }

    pub fn add_slider(
        &mut self,
        folder: FolderId,
        field: Field,
        range: SliderRange,
        settings: &Settings,
    ) -> WidgetId {
        self.push(folder, field.label(), WidgetKind::Slider { field, range }, settings)
    }

    pub fn add_toggle(&mut self, folder: FolderId, field: Field, settings: &Settings) -> WidgetId {
        self.push(folder, field.label(), WidgetKind::Toggle { field }, settings)
    }

    pub fn add_button(
        &mut self,
        folder: FolderId,
        label: &'static str,
        settings: &Settings,
    ) -> WidgetId {
        self.push(folder, label, WidgetKind::Button, settings)
    }

    fn push(
        &mut self,
        folder: FolderId,
        label: &'static str,
        kind: WidgetKind,
        settings: &Settings,
    ) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        self.widgets.push(Widget {
            folder,
            label,
            kind,
            displayed: None,
            hook: None,
        });
        self.refresh_displayed_value(id, settings);
        id
    }

    /// Register the hook reported after every applied edit of `id`
    pub fn on_change(&mut self, id: WidgetId, hook: H) {
        if let Some(widget) = self.widgets.get_mut(id.0) {
            widget.hook = Some(hook);
        }
    }

    /// Re-read the bound field into the widget's displayed value
    pub fn refresh_displayed_value(&mut self, id: WidgetId, settings: &Settings) {
        if let Some(widget) = self.widgets.get_mut(id.0) {
            widget.displayed = widget.field().map(|field| settings.get(field));
        }
    }

    pub fn widget_ids(&self) -> impl Iterator<Item = WidgetId> {
        (0..self.widgets.len()).map(WidgetId)
    }

    pub fn displayed_value(&self, id: WidgetId) -> Option<FieldValue> {
        self.widgets.get(id.0).and_then(|w| w.displayed)
    }

    pub fn field(&self, id: WidgetId) -> Option<Field> {
        self.widgets.get(id.0).and_then(Widget::field)
    }

    /// Widget bound to `field`, if any
    pub fn find(&self, field: Field) -> Option<WidgetId> {
        self.widgets
            .iter()
            .position(|w| w.field() == Some(field))
            .map(WidgetId)
    }

    pub fn selected(&self) -> Option<WidgetId> {
        (self.selected < self.widgets.len()).then_some(WidgetId(self.selected))
    }

    pub fn select_next(&mut self) {
        if !self.widgets.is_empty() {
            self.selected = (self.selected + 1) % self.widgets.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.widgets.is_empty() {
            self.selected = (self.selected + self.widgets.len() - 1) % self.widgets.len();
        }
    }

    /// Applies `edit` to widget `id`, writing the clamped result through to
    /// `settings`. Returns `None` if the edit does not apply to the widget
    /// or leaves the value unchanged.
    pub fn edit(
        &mut self,
        id: WidgetId,
        edit: WidgetEdit,
        settings: &mut Settings,
    ) -> Option<EditOutcome<H>> {
        let widget = self.widgets.get_mut(id.0)?;
        let field = match (&widget.kind, edit) {
            (WidgetKind::Slider { field, range }, WidgetEdit::Step(steps)) => {
                let current = settings.get(*field).as_number()?;
                let next = range.clamp(current + range.step * steps as f64);
                write_number(settings, *field, current, next)?
            }
            (WidgetKind::Slider { field, range }, WidgetEdit::Set(value)) => {
                let current = settings.get(*field).as_number()?;
                write_number(settings, *field, current, range.clamp(value))?
            }
            (WidgetKind::Toggle { field }, WidgetEdit::Toggle | WidgetEdit::Press) => {
                let current = settings.get(*field).as_flag()?;
                settings.set(*field, FieldValue::Flag(!current));
                Some(*field)
            }
            (WidgetKind::Button, WidgetEdit::Press) => None,
            _ => return None,
        };
        widget.displayed = field.map(|f| settings.get(f));
        Some(EditOutcome {
            field,
            hook: widget.hook,
        })
    }

    /// Text lines for drawing the panel, folder headers included
    pub fn lines(&self) -> Vec<PanelLine> {
        let mut lines = vec![PanelLine {
            text: self.title.to_string(),
            selected: false,
            header: true,
        }];
        for (index, folder) in self.folders.iter().enumerate() {
            lines.push(PanelLine {
                text: format!("▾ {}", folder),
                selected: false,
                header: true,
            });
            for (widget_index, widget) in self.widgets.iter().enumerate() {
                if widget.folder.0 != index {
                    continue;
                }
                lines.push(PanelLine {
                    text: widget.describe(),
                    selected: widget_index == self.selected,
                    header: false,
                });
            }
        }
        lines
    }
}

impl<H> Widget<H> {
    fn field(&self) -> Option<Field> {
        match self.kind {
            WidgetKind::Slider { field, .. } | WidgetKind::Toggle { field } => Some(field),
            WidgetKind::Button => None,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, self.displayed) {
            (WidgetKind::Slider { range, .. }, Some(FieldValue::Number(n))) if range.integer => {
                format!("  {:<17}{:>6.0}", self.label, n)
            }
            (WidgetKind::Slider { .. }, Some(FieldValue::Number(n))) => {
                format!("  {:<17}{:>6.2}", self.label, n)
            }
            (WidgetKind::Toggle { .. }, Some(FieldValue::Flag(on))) => {
                format!("  {:<17}{:>6}", self.label, if on { "[x]" } else { "[ ]" })
            }
            _ => format!("  [ {} ]", self.label),
        }
    }
}

/// Writes `next` unless it equals `current`; yields the field written
fn write_number(
    settings: &mut Settings,
    field: Field,
    current: f64,
    next: f64,
) -> Option<Option<Field>> {
    if (next - current).abs() < 1e-9 {
        return None;
    }
    settings.set(field, FieldValue::Number(next));
    Some(Some(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_range_rounds_and_clamps() {
        let range = SliderRange::integer(3.0, 100.0);
        assert_eq!(range.clamp(2.0), 3.0);
        assert_eq!(range.clamp(-7.0), 3.0);
        assert_eq!(range.clamp(7.6), 8.0);
        assert_eq!(range.clamp(1e9), 100.0);
        assert_eq!(range.clamp(f64::NAN), 3.0);
    }

    #[test]
    fn selection_wraps_around() {
        let settings = Settings::default();
        let mut panel: ControlPanel<()> = ControlPanel::new("test");
        let folder = panel.add_folder("f");
        let first = panel.add_toggle(folder, Field::RotateX, &settings);
        let second = panel.add_toggle(folder, Field::RotateY, &settings);
        assert_eq!(panel.selected(), Some(first));
        panel.select_next();
        assert_eq!(panel.selected(), Some(second));
        panel.select_next();
        assert_eq!(panel.selected(), Some(first));
        panel.select_previous();
        assert_eq!(panel.selected(), Some(second));
    }

    #[test]
    fn unchanged_slider_value_reports_nothing() {
        let mut settings = Settings::default();
        let mut panel: ControlPanel<()> = ControlPanel::new("test");
        let folder = panel.add_folder("f");
        let range = SliderRange::integer(3.0, 100.0);
        let id = panel.add_slider(folder, Field::RadialSegments, range, &settings);
        assert!(panel.edit(id, WidgetEdit::Set(40.0), &mut settings).is_none());
        assert!(panel.edit(id, WidgetEdit::Toggle, &mut settings).is_none());
    }

    #[test]
    fn lines_mark_selected_widget() {
        let settings = Settings::default();
        let mut panel: ControlPanel<()> = ControlPanel::new("Torus");
        let folder = panel.add_folder("Shape");
        panel.add_slider(folder, Field::MajorRadius, SliderRange::new(0.05, 5.0, 0.05), &settings);
        let lines = panel.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].header && lines[1].header);
        assert!(lines[2].selected);
        assert!(lines[2].text.contains("Major radius"));
        assert!(lines[2].text.contains("1.00"));
    }
}
