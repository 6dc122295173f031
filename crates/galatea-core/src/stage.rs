//! Stage — a 2-D placement grid.
//!
//! Cells hold a substrate or a mixed substrate drawn from the stage's
//! associated substrate set. The stage keeps only the id of that set: it
//! does not own the set, and the set can be swapped. Operations that
//! check membership take the set as an argument and refuse any other set.
//!
//! Positions are `(x, y)` with `x` the column in `[0, width)` and `y` the
//! row in `[0, height)`.

use crate::error::StageError;
use crate::mixed::MixedSubstrate;
use crate::set::SubstrateSet;
use crate::substrate::Substrate;
use crate::types::{MixedSubstrateId, StageId, SubstrateId, SubstrateSetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content of one grid cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Substrate(Substrate),
    Mixed(MixedSubstrate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn substrate(&self) -> Option<&Substrate> {
        match self {
            Cell::Substrate(s) => Some(s),
            _ => None,
        }
    }

    pub fn mixed_substrate(&self) -> Option<&MixedSubstrate> {
        match self {
            Cell::Mixed(ms) => Some(ms),
            _ => None,
        }
    }

    fn member_of(&self, set: &SubstrateSet) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Substrate(s) => set.contains_substrate(&s.id),
            Cell::Mixed(ms) => set.contains_mixed_substrate(&ms.id),
        }
    }
}

/// How a stage treats empty cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum CellPolicy {
    /// Empty cells hold nothing. Placing into an occupied cell and
    /// clearing an empty one both fail.
    #[default]
    Strict,
    /// Every empty cell holds `substrate`. Placements overwrite and
    /// clearing resets to the default.
    DefaultFill { substrate: Substrate },
}

/// A grid of cells bound to one substrate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    substrate_set_id: SubstrateSetId,
    #[serde(default)]
    policy: CellPolicy,
    width: usize,
    height: usize,
    /// Row-major: `grid[y][x]`.
    grid: Vec<Vec<Cell>>,
}

impl Stage {
    /// Create a stage of `width` x `height` empty cells bound to `set`.
    ///
    /// With [`CellPolicy::DefaultFill`] the default substrate must be a
    /// member of `set`.
    pub fn new(
        id: impl Into<StageId>,
        name: impl Into<String>,
        width: usize,
        height: usize,
        set: &SubstrateSet,
        policy: CellPolicy,
    ) -> Result<Self, StageError> {
        check_dimensions(width, height)?;
        let policy = canonical_policy(policy, set)?;

        let mut stage = Self {
            id: id.into(),
            name: name.into(),
            comment: String::new(),
            substrate_set_id: set.id.clone(),
            policy,
            width,
            height,
            grid: Vec::new(),
        };
        stage.grid = vec![vec![stage.empty_cell(); width]; height];
        Ok(stage)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn substrate_set_id(&self) -> &SubstrateSetId {
        &self.substrate_set_id
    }

    pub fn policy(&self) -> &CellPolicy {
        &self.policy
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn is_valid_position(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Place a member substrate of `set` at `(x, y)`.
    pub fn place_substrate(
        &mut self,
        set: &SubstrateSet,
        x: usize,
        y: usize,
        substrate_id: &SubstrateId,
    ) -> Result<(), StageError> {
        self.check_position(x, y)?;
        self.check_set(set)?;

        let substrate = set
            .find_substrate(substrate_id)
            .ok_or_else(|| StageError::SubstrateNotInSet(substrate_id.0.clone()))?;

        self.check_vacant(x, y)?;
        self.grid[y][x] = Cell::Substrate(substrate.clone());
        Ok(())
    }

    /// Place a member mix of `set` at `(x, y)`.
    pub fn place_mixed_substrate(
        &mut self,
        set: &SubstrateSet,
        x: usize,
        y: usize,
        mixed_substrate_id: &MixedSubstrateId,
    ) -> Result<(), StageError> {
        self.check_position(x, y)?;
        self.check_set(set)?;

        let mixed = set
            .find_mixed_substrate(mixed_substrate_id)
            .ok_or_else(|| StageError::MixedSubstrateNotInSet(mixed_substrate_id.0.clone()))?;

        self.check_vacant(x, y)?;
        self.grid[y][x] = Cell::Mixed(mixed.clone());
        Ok(())
    }

    /// Reset a cell to the empty/default state.
    pub fn clear_cell(&mut self, x: usize, y: usize) -> Result<(), StageError> {
        self.check_position(x, y)?;

        if matches!(self.policy, CellPolicy::Strict) && self.grid[y][x].is_empty() {
            return Err(StageError::CellHasNoContent { x, y });
        }

        self.grid[y][x] = self.empty_cell();
        Ok(())
    }

    /// A copy of the cell at `(x, y)`.
    pub fn get_cell(&self, x: usize, y: usize) -> Result<Cell, StageError> {
        self.check_position(x, y)?;
        Ok(self.grid[y][x].clone())
    }

    /// Change the grid dimensions.
    ///
    /// Content in the overlapping rectangle is kept, content outside it is
    /// discarded, and newly exposed cells start empty.
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<(), StageError> {
        check_dimensions(new_width, new_height)?;

        let empty = self.empty_cell();
        let mut grid = std::mem::take(&mut self.grid);

        grid.truncate(new_height);
        for row in &mut grid {
            row.resize(new_width, empty.clone());
        }
        grid.resize(new_height, vec![empty; new_width]);

        self.grid = grid;
        self.width = new_width;
        self.height = new_height;
        Ok(())
    }

    /// Bind the stage to another set (or re-sync it with the current one).
    ///
    /// Cell snapshots are refreshed from the set's records, and cells whose
    /// content is not a member of `set` are reset. Returns how many cells
    /// were reset.
    pub fn change_substrate_set(&mut self, set: &SubstrateSet) -> Result<usize, StageError> {
        let policy = canonical_policy(self.policy.clone(), set)?;
        let old_empty = self.empty_cell();

        self.policy = policy;
        self.substrate_set_id = set.id.clone();
        let empty = self.empty_cell();

        let mut reset = 0;
        for cell in self.grid.iter_mut().flatten() {
            if *cell == old_empty {
                *cell = empty.clone();
                continue;
            }
            if !cell.member_of(set) {
                *cell = empty.clone();
                reset += 1;
                continue;
            }
            match cell {
                Cell::Substrate(s) => {
                    if let Some(current) = set.find_substrate(&s.id) {
                        *s = current.clone();
                    }
                }
                Cell::Mixed(ms) => {
                    if let Some(current) = set.find_mixed_substrate(&ms.id) {
                        *ms = current.clone();
                    }
                }
                Cell::Empty => {}
            }
        }

        Ok(reset)
    }

    /// Number of cells holding something other than the empty/default state.
    pub fn occupied_cells(&self) -> usize {
        let empty = self.empty_cell();
        self.grid.iter().flatten().filter(|c| **c != empty).count()
    }

    /// A row-major copy of the whole grid.
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        self.grid.clone()
    }

    fn empty_cell(&self) -> Cell {
        match &self.policy {
            CellPolicy::Strict => Cell::Empty,
            CellPolicy::DefaultFill { substrate } => Cell::Substrate(substrate.clone()),
        }
    }

    fn check_position(&self, x: usize, y: usize) -> Result<(), StageError> {
        if !self.is_valid_position(x, y) {
            return Err(StageError::InvalidPosition { x, y });
        }
        Ok(())
    }

    fn check_set(&self, set: &SubstrateSet) -> Result<(), StageError> {
        if set.id != self.substrate_set_id {
            return Err(StageError::SubstrateSetMismatch {
                expected: self.substrate_set_id.0.clone(),
                found: set.id.0.clone(),
            });
        }
        Ok(())
    }

    fn check_vacant(&self, x: usize, y: usize) -> Result<(), StageError> {
        if matches!(self.policy, CellPolicy::Strict) && !self.grid[y][x].is_empty() {
            return Err(StageError::CellAlreadyHasContent { x, y });
        }
        Ok(())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stage {} ({}) - {}x{}", self.id, self.name, self.width, self.height)?;
        for row in &self.grid {
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, "[ ]")?,
                    Cell::Substrate(s) => write!(f, "[S:{}]", s.id)?,
                    Cell::Mixed(ms) => write!(f, "[M:{}]", ms.id)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), StageError> {
    if width == 0 || height == 0 {
        return Err(StageError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Resolve the default substrate against `set`, using the set's record.
fn canonical_policy(policy: CellPolicy, set: &SubstrateSet) -> Result<CellPolicy, StageError> {
    match policy {
        CellPolicy::Strict => Ok(CellPolicy::Strict),
        CellPolicy::DefaultFill { substrate } => {
            let current = set
                .find_substrate(&substrate.id)
                .ok_or_else(|| StageError::SubstrateNotInSet(substrate.id.0.clone()))?;
            Ok(CellPolicy::DefaultFill {
                substrate: current.clone(),
            })
        }
    }
}
