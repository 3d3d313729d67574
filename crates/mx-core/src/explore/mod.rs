//! Exploration passes over a model
//!
//! Each pass walks the scene graph with a visitor and returns a typed
//! report that renders to text through `Display`.

mod appearances;
mod bom;
mod brep;
mod geometry;
mod layers;
mod pmi;
mod poly;
mod properties;
mod removal;
mod stats;
mod transforms;

use indexmap::IndexSet;
use mx_cad::Visit;

pub use appearances::{AppearanceReport, AppearanceSource, AppearanceUse, collect_appearances};
pub use bom::{Bom, BomEntry, BomLine, bill_of_materials};
pub use brep::{BRepReport, BodyListing, explore_brep};
pub use geometry::{PartGeometry, explore_geometry};
pub use layers::{
    ELEMENT_LAYER, LayerStatistics, SUBSHAPE_LAYER, fill_default_layers, layer_statistics,
};
pub use pmi::{ElementPmi, explore_pmi};
pub use poly::{PartPoly, PolyReport, explore_poly};
pub use properties::{PropertySection, collect_properties};
pub use removal::{RemovalSummary, remove_elements_named};
pub use stats::SceneStats;
pub use transforms::{InstanceTransform, instance_transforms};

use crate::model::Model;
use crate::scene::{ElementId, Part};
use crate::traverse::{ElementVisitor, VisitContext};

#[derive(Default)]
struct Reachable(IndexSet<ElementId>);

impl ElementVisitor for Reachable {
    fn visit_part(&mut self, ctx: &VisitContext<'_>, _part: &Part) {
        self.0.insert(ctx.id);
    }

    fn visit_enter_element(&mut self, ctx: &VisitContext<'_>) -> Visit {
        // a shared subtree is entered once
        Visit::from_descend(self.0.insert(ctx.id))
    }
}

/// Distinct elements reachable from the roots, in first-visit order
pub(crate) fn reachable_elements(model: &Model) -> Vec<ElementId> {
    let mut reachable = Reachable::default();
    model.accept(&mut reachable);
    reachable.0.into_iter().collect()
}
