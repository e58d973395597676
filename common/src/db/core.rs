use crate::db::indices::*;
use crate::db::undo::{UndoEvent, UndoLog};
use crate::geom::coord::Coord;
use crate::geom::rect::Rect;
use crate::geom::rtree::SpatialIndex;
use crate::geom::transform::Transform;
use crate::tiles::ChannelPlanes;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbError {
    #[error("cell definition '{0}' already exists")]
    DuplicateDef(String),
    #[error("unknown cell definition '{0}'")]
    UnknownDef(String),
    #[error("array use '{0}' needs at least one column and one row")]
    EmptyArray(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayInfo {
    pub columns: u32,
    pub rows: u32,
    pub x_sep: Coord,
    pub y_sep: Coord,
}

#[derive(Clone, Debug)]
pub struct CellUse {
    pub name: String,
    pub def: DefId,
    pub transform: Transform,
    pub array: Option<ArrayInfo>,
    /// Bounding box of all elements, in parent coordinates.
    pub bbox: Rect,
}

impl CellUse {
    /// Transform of every array element (a single one for plain uses).
    /// Element (col, row) is offset by (col * x_sep, row * y_sep) in the
    /// child's coordinates before the use transform is applied.
    pub fn elements(&self) -> impl Iterator<Item = Transform> + '_ {
        let (columns, rows, x_sep, y_sep) = match self.array {
            Some(a) => (a.columns, a.rows, a.x_sep, a.y_sep),
            None => (1, 1, 0, 0),
        };
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |col| {
                Transform::translate(col as Coord * x_sep, row as Coord * y_sep)
                    .then(&self.transform)
            })
        })
    }

    fn element_bbox(transform: &Transform, array: Option<ArrayInfo>, child: Rect) -> Rect {
        let Some(a) = array else {
            return transform.apply_rect(child);
        };
        let last_col = (a.columns - 1) as Coord;
        let last_row = (a.rows - 1) as Coord;
        [(0, 0), (last_col, 0), (0, last_row), (last_col, last_row)]
            .iter()
            .map(|&(c, r)| {
                Transform::translate(c * a.x_sep, r * a.y_sep)
                    .then(transform)
                    .apply_rect(child)
            })
            .fold(Rect::default(), |acc, r| acc.union(&r))
    }
}

#[derive(Debug)]
pub struct CellDef {
    pub name: String,
    pub bbox: Rect,
    pub uses: Vec<CellUse>,
    /// Internal cells are created by tools and never written out.
    pub is_internal: bool,
    pub planes: Option<ChannelPlanes>,
    use_index: SpatialIndex,
}

impl CellDef {
    fn new(name: String, bbox: Rect) -> Self {
        Self {
            name,
            bbox,
            uses: Vec::new(),
            is_internal: false,
            planes: None,
            use_index: SpatialIndex::new(),
        }
    }

    /// Uses whose bounding box overlaps `area`, in insertion order.
    pub fn uses_in(&self, area: Rect) -> Vec<UseId> {
        self.use_index
            .query(area)
            .into_iter()
            .map(UseId::new)
            .collect()
    }

    pub fn cell_use(&self, id: UseId) -> &CellUse {
        &self.uses[id.index()]
    }

    /// Bounding box of the uses and of any painted solid geometry.
    pub fn recompute_bbox(&mut self) {
        let from_uses = self
            .uses
            .iter()
            .fold(Rect::default(), |acc, u| acc.union(&u.bbox));
        let from_paint = self
            .planes
            .as_ref()
            .map(|p| p.solid_bbox())
            .unwrap_or_default();
        self.bbox = from_uses.union(&from_paint);
    }
}

#[derive(Clone, Debug, Default)]
pub struct Net {
    pub name: String,
    /// `(component, pin)` pairs.
    pub terminals: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default)]
pub struct Netlist {
    pub name: String,
    pub nets: Vec<Net>,
}

impl Netlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nets: Vec::new(),
        }
    }

    pub fn add_net(&mut self, name: impl Into<String>) -> NetId {
        let id = NetId::new(self.nets.len());
        self.nets.push(Net {
            name: name.into(),
            terminals: Vec::new(),
        });
        id
    }
}

pub struct LayoutDb {
    pub defs: Vec<CellDef>,
    pub def_name_map: HashMap<String, DefId>,
    pub netlists: HashMap<String, Netlist>,
    pub undo: UndoLog,
    /// Library macro sizes in microns, as read from LEF.
    pub macro_sizes: HashMap<String, (f64, f64)>,
}

impl Default for LayoutDb {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDb {
    pub fn new() -> Self {
        Self {
            defs: Vec::with_capacity(64),
            def_name_map: HashMap::new(),
            netlists: HashMap::new(),
            undo: UndoLog::new(),
            macro_sizes: HashMap::new(),
        }
    }

    pub fn num_defs(&self) -> usize {
        self.defs.len()
    }

    pub fn def(&self, id: DefId) -> &CellDef {
        &self.defs[id.index()]
    }

    pub fn def_mut(&mut self, id: DefId) -> &mut CellDef {
        &mut self.defs[id.index()]
    }

    pub fn lookup_def(&self, name: &str) -> Option<DefId> {
        self.def_name_map.get(name).copied()
    }

    pub fn add_def(&mut self, name: &str, bbox: Rect) -> Result<DefId, DbError> {
        if self.def_name_map.contains_key(name) {
            return Err(DbError::DuplicateDef(name.to_string()));
        }
        let id = DefId::new(self.defs.len());
        self.defs.push(CellDef::new(name.to_string(), bbox));
        self.def_name_map.insert(name.to_string(), id);
        self.undo.record(UndoEvent::DefCreated(name.to_string()));
        Ok(id)
    }

    pub fn def_or_create(&mut self, name: &str) -> DefId {
        if let Some(id) = self.lookup_def(name) {
            return id;
        }
        let id = DefId::new(self.defs.len());
        self.defs.push(CellDef::new(name.to_string(), Rect::default()));
        self.def_name_map.insert(name.to_string(), id);
        self.undo.record(UndoEvent::DefCreated(name.to_string()));
        id
    }

    pub fn add_use(
        &mut self,
        parent: DefId,
        name: &str,
        child: &str,
        transform: Transform,
        array: Option<ArrayInfo>,
    ) -> Result<UseId, DbError> {
        let child_id = self
            .lookup_def(child)
            .ok_or_else(|| DbError::UnknownDef(child.to_string()))?;
        if let Some(a) = array
            && (a.columns == 0 || a.rows == 0)
        {
            return Err(DbError::EmptyArray(name.to_string()));
        }

        let child_bbox = self.defs[child_id.index()].bbox;
        let bbox = CellUse::element_bbox(&transform, array, child_bbox);
        let def = &mut self.defs[parent.index()];
        let id = UseId::new(def.uses.len());
        def.uses.push(CellUse {
            name: name.to_string(),
            def: child_id,
            transform,
            array,
            bbox,
        });
        def.use_index.insert(bbox, id.index());

        let parent_name = def.name.clone();
        self.undo.record(UndoEvent::UseAdded {
            parent: parent_name,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Gives `id` a pair of empty planes covering `bounds`, reusing the
    /// existing allocation when there is one.
    pub fn reset_channel_planes(&mut self, id: DefId, bounds: Rect) -> &mut ChannelPlanes {
        let name = self.defs[id.index()].name.clone();
        self.undo.record(UndoEvent::PlanesCleared(name));
        let def = &mut self.defs[id.index()];
        match &mut def.planes {
            Some(planes) => planes.reset(bounds),
            None => def.planes = Some(ChannelPlanes::new(bounds)),
        }
        def.planes.get_or_insert_with(|| ChannelPlanes::new(bounds))
    }

    pub fn netlist(&self, name: &str) -> Option<&Netlist> {
        self.netlists.get(name)
    }

    pub fn add_netlist(&mut self, netlist: Netlist) {
        self.netlists.insert(netlist.name.clone(), netlist);
    }
}
