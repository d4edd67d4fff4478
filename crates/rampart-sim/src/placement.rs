//! Staged defender placement.
//!
//! A draft holds the template, position and an optional staged element.
//! Nothing is charged or spawned until the engine commits it; cancelling or
//! dropping a draft discards the staged element with no effect.

use log::debug;

use rampart_core::config::DefenderTemplate;
use rampart_core::enums::ElementType;
use rampart_core::error::ElementError;
use rampart_core::types::Position;

use crate::elemental::{upgrade_cost, ElementCatalog};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementDraft {
    template_id: String,
    position: Position,
    staged: Option<ElementType>,
}

impl PlacementDraft {
    pub fn new(template_id: impl Into<String>, position: Position) -> Self {
        Self {
            template_id: template_id.into(),
            position,
            staged: None,
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn staged_element(&self) -> Option<ElementType> {
        self.staged
    }

    /// Stage an element for the commit. Replaces any earlier choice.
    pub fn stage_element(&mut self, element: ElementType) -> Option<ElementType> {
        self.staged.replace(element)
    }

    /// Defender cost plus tier 1 of the staged element.
    pub fn total_cost(
        &self,
        template: &DefenderTemplate,
        catalog: &ElementCatalog,
    ) -> Result<u32, ElementError> {
        let element_cost = match self.staged {
            Some(element) => {
                catalog.tier(element, 1)?;
                upgrade_cost(element, 1)
            }
            None => 0,
        };
        Ok(template.cost.saturating_add(element_cost))
    }

    /// Abandon the draft.
    pub fn cancel(self) {
        debug!(
            "placement of {:?} cancelled, staged {:?} discarded",
            self.template_id, self.staged
        );
    }
}
