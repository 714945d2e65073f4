//! Binds settings fields to control-panel widgets.
//!
//! Shape edits regenerate the torus mesh and mirror the radii into the
//! shader uniforms before returning, so the next tick never sees one
//! without the other. Every other field is a plain settings write that the
//! render loop picks up on its next tick.

use crate::backend::RenderBackend;
use crate::camera::CameraControls;
use crate::state::{Field, Settings};
use crate::torus::TorusObject;
use crate::widget::{ControlPanel, SliderRange, WidgetEdit, WidgetId};

/// Post-edit hooks registered on panel widgets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    RegenerateShape,
    ResetAll,
}

/// Mutable state an edit may touch, passed explicitly to every edit
pub struct SceneContext<'a, B, C> {
    pub settings: &'a mut Settings,
    pub torus: &'a mut TorusObject,
    pub camera: &'a mut C,
    pub backend: &'a mut B,
}

pub const RADIUS_RANGE: SliderRange = SliderRange::new(0.05, 5.0, 0.05);

pub const SEGMENT_RANGE: SliderRange = SliderRange::integer(3.0, 100.0);

pub const ROTATION_SPEED_RANGE: SliderRange = SliderRange::new(0.0, 10.0, 0.1);

/// Control panel wired to the settings record
pub struct ControlPanelBinding {
    pub panel: ControlPanel<PanelAction>,
    reset_button: WidgetId,
}

impl ControlPanelBinding {
    pub fn new(settings: &Settings) -> Self {
        let mut panel = ControlPanel::new("Torus controls");

        let shape = panel.add_folder("Shape");
        for (field, range) in [
            (Field::MajorRadius, RADIUS_RANGE),
            (Field::MinorRadius, RADIUS_RANGE),
            (Field::RadialSegments, SEGMENT_RANGE),
            (Field::TubularSegments, SEGMENT_RANGE),
        ] {
            let id = panel.add_slider(shape, field, range, settings);
            panel.on_change(id, PanelAction::RegenerateShape);
        }

        let animation = panel.add_folder("Animation");
        panel.add_slider(animation, Field::RotationSpeed, ROTATION_SPEED_RANGE, settings);
        for field in [
            Field::RotateX,
            Field::RotateY,
            Field::RotateZ,
            Field::FlowAnimation,
            Field::RainbowMode,
            Field::Wireframe,
        ] {
            panel.add_toggle(animation, field, settings);
        }

        let actions = panel.add_folder("Actions");
        let reset_button = panel.add_button(actions, "Reset", settings);
        panel.on_change(reset_button, PanelAction::ResetAll);

        ControlPanelBinding {
            panel,
            reset_button,
        }
    }

    pub fn reset_button(&self) -> WidgetId {
        self.reset_button
    }

    /// Applies a widget edit and runs its post-edit hook
    pub fn apply_edit<B: RenderBackend, C: CameraControls>(
        &mut self,
        id: WidgetId,
        edit: WidgetEdit,
        ctx: &mut SceneContext<'_, B, C>,
    ) -> Result<(), B::Error> {
        let Some(outcome) = self.panel.edit(id, edit, ctx.settings) else {
            return Ok(());
        };
        log::debug!("panel edit {:?} on {:?}", edit, outcome.field);

        match outcome.hook {
            Some(PanelAction::RegenerateShape) => apply_shape_edit(ctx),
            Some(PanelAction::ResetAll) => self.reset_all(ctx),
            None => Ok(()),
        }
    }

    /// Edits the widget bound to `field`
    pub fn edit_field<B: RenderBackend, C: CameraControls>(
        &mut self,
        field: Field,
        edit: WidgetEdit,
        ctx: &mut SceneContext<'_, B, C>,
    ) -> Result<(), B::Error> {
        match self.panel.find(field) {
            Some(id) => self.apply_edit(id, edit, ctx),
            None => Ok(()),
        }
    }

    /// Applies `edit` to the currently selected widget
    pub fn edit_selected<B: RenderBackend, C: CameraControls>(
        &mut self,
        edit: WidgetEdit,
        ctx: &mut SceneContext<'_, B, C>,
    ) -> Result<(), B::Error> {
        match self.panel.selected() {
            Some(id) => self.apply_edit(id, edit, ctx),
            None => Ok(()),
        }
    }

    /// Restores every default, rebuilds the mesh, and resets transform,
    /// camera, and every widget's displayed value.
    pub fn reset_all<B: RenderBackend, C: CameraControls>(
        &mut self,
        ctx: &mut SceneContext<'_, B, C>,
    ) -> Result<(), B::Error> {
        log::info!("resetting all settings to defaults");
        *ctx.settings = Settings::default();
        let regenerated = apply_shape_edit(ctx);
        ctx.torus.shader.uniforms.rainbow_mode = ctx.settings.animation.rainbow_mode;
        ctx.torus.reset_transform();
        ctx.camera.reset();

        let ids: Vec<WidgetId> = self.panel.widget_ids().collect();
        for id in ids {
            self.panel.refresh_displayed_value(id, ctx.settings);
        }
        regenerated
    }
}

/// Regenerates the mesh and mirrors the radii in one step.
///
/// The uniforms follow the settings even when the backend reports an error.
fn apply_shape_edit<B: RenderBackend, C>(ctx: &mut SceneContext<'_, B, C>) -> Result<(), B::Error> {
    let result = ctx.torus.apply_shape_change(ctx.settings, ctx.backend);
    ctx.torus.sync_radii(&ctx.settings.shape);
    result
}
