//! The projector: replays change records into the level
//!
//! The projector owns the level, the change log, and the observer list. It
//! is the only component that mutates the level, and it does so exclusively
//! while handling a record: the public write surface builds records and
//! sends them, so the level's observable state is always exactly what
//! replaying the undo stack from empty would produce.
//!
//! Sequencing per record is fixed: apply, then notify observers, then log.
//! Observers are notified in registration order. Everything is synchronous
//! and single-threaded; an observer that re-enters the projector during a
//! notification is unsupported.

use tracing::warn;

use tileforge_core::{
    Cell, GridPos, GridRect, Level, MetadataEntry, MetadataKind, Value,
};

use crate::log::ChangeLog;
use crate::record::{
    ChangeRecord, FieldChange, LayerMetadataChange, MetadataOp, PathField, TileChange,
};

/// Observer of the edit stream. Renderers and UI panels implement this to
/// redraw changed cells and refresh undo menus.
pub trait EditObserver {
    /// Called after a record's forward effect has been applied to the level.
    fn record_applied(&mut self, record: &ChangeRecord);

    /// Called after the logged history changes: new entry, undo, redo, or a
    /// wholesale reload.
    fn log_changed(&mut self, log: &ChangeLog) {
        let _ = log;
    }
}

/// Owns a [`Level`] and applies every edit to it through the change log.
#[derive(Default)]
pub struct Projector {
    level: Level,
    log: ChangeLog,
    observers: Vec<Box<dyn EditObserver>>,
}

impl Projector {
    /// A projector over an empty level, as on editor startup.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            log: ChangeLog::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Notification order is registration order.
    pub fn add_observer(&mut self, observer: Box<dyn EditObserver>) {
        self.observers.push(observer);
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    /// The cell at `pos` on `layer`. Negative or out-of-range layers read as
    /// the empty cell.
    pub fn query(&self, pos: GridPos, layer: i32) -> Cell {
        if layer < 0 {
            return Cell::empty();
        }
        self.level.cell_at(pos, layer as usize)
    }

    /// Cached level bounds (union of all layer rects).
    pub fn bounds(&self) -> GridRect {
        self.level.bounds()
    }

    /// Write `cells` to `positions` on `layer` as one logged edit. The two
    /// slices pair 1:1 by index. Previous cell values are snapshotted from
    /// the level so the edit reverts exactly.
    pub fn write(
        &mut self,
        layer: i32,
        positions: Vec<GridPos>,
        cells: Vec<Cell>,
        description: impl Into<String>,
    ) {
        if layer < 0 {
            warn!(layer, "write rejected: negative layer id");
            return;
        }
        if positions.len() != cells.len() {
            warn!(
                positions = positions.len(),
                cells = cells.len(),
                "write rejected: mismatched position/cell counts"
            );
            return;
        }
        let previous = positions
            .iter()
            .map(|&pos| self.level.cell_at(pos, layer as usize))
            .collect();
        let record =
            ChangeRecord::Tiles(TileChange::new(layer, positions, previous, cells, description));
        self.dispatch(record, true);
    }

    /// Set one layer-scoped metadata entry as a logged edit.
    pub fn set_layer_metadata(
        &mut self,
        layer: i32,
        entry: MetadataEntry,
        description: impl Into<String>,
    ) {
        if layer < 0 {
            warn!(layer, "metadata edit rejected: negative layer id");
            return;
        }
        let record = ChangeRecord::LayerMeta(LayerMetadataChange {
            description: description.into(),
            layer,
            entry,
            op: MetadataOp::Add,
        });
        self.dispatch(record, true);
    }

    /// Remove the layer-scoped metadata entry of `kind` as a logged edit.
    /// No-op when the layer has no such entry.
    pub fn remove_layer_metadata(
        &mut self,
        layer: i32,
        kind: MetadataKind,
        description: impl Into<String>,
    ) {
        if layer < 0 {
            warn!(layer, "metadata edit rejected: negative layer id");
            return;
        }
        // The removed entry rides along in the record so undo can restore it.
        let Some(entry) = self
            .level
            .metadata(layer as usize)
            .and_then(|meta| meta.get(kind))
            .cloned()
        else {
            return;
        };
        let record = ChangeRecord::LayerMeta(LayerMetadataChange {
            description: description.into(),
            layer,
            entry,
            op: MetadataOp::Remove,
        });
        self.dispatch(record, true);
    }

    /// Edit one field of the motion path stored on `layer` as a logged edit.
    /// No-op when the layer has no path.
    pub fn set_path_field(
        &mut self,
        layer: i32,
        field: PathField,
        next: Value,
        description: impl Into<String>,
    ) {
        if layer < 0 {
            warn!(layer, "path edit rejected: negative layer id");
            return;
        }
        let Some(path) = self
            .level
            .metadata(layer as usize)
            .and_then(|meta| meta.path())
        else {
            warn!(layer, "path edit rejected: layer has no path");
            return;
        };
        let previous = match field {
            PathField::Speed => Value::Float(path.speed),
            PathField::Looped => Value::Bool(path.looped),
            PathField::Point(index) => path
                .points
                .get(index)
                .map(|&point| point_to_value(point))
                .unwrap_or(Value::Null),
        };
        let record = ChangeRecord::Field(FieldChange {
            description: description.into(),
            layer,
            field,
            previous,
            next,
        });
        self.dispatch(record, true);
    }

    /// Open a bundle: every edit until `end_bundle` becomes part of one
    /// atomic undo entry.
    pub fn start_bundle(&mut self, description: impl Into<String>) {
        if !self.log.open_bundle(description) {
            warn!("start_bundle ignored: a bundle is already open");
        }
    }

    /// Close the open bundle and log it as a single entry. The bundled
    /// records were already applied one by one while the bundle was open;
    /// replay is idempotent, so sending the bundle leaves the level as-is
    /// and only adds the log entry.
    pub fn end_bundle(&mut self) {
        let Some(bundle) = self.log.close_bundle() else {
            warn!("end_bundle ignored: no bundle is open");
            return;
        };
        if bundle.items.is_empty() {
            return;
        }
        self.dispatch(ChangeRecord::Bundle(bundle), true);
    }

    /// Revert the most recent logged entry. Silent no-op on an empty stack.
    pub fn undo(&mut self) {
        let Some(record) = self.log.pop_undo() else {
            return;
        };
        let reverted = record.reverted();
        self.dispatch(reverted.clone(), false);
        self.log.push_redo(reverted);
        self.notify_log_changed();
    }

    /// Reapply the most recently undone entry. Silent no-op on an empty
    /// stack.
    pub fn redo(&mut self) {
        let Some(record) = self.log.pop_redo() else {
            return;
        };
        let reverted = record.reverted();
        self.dispatch(reverted.clone(), false);
        self.log.push_undo(reverted);
        self.notify_log_changed();
    }

    /// Record the current history depth as the saved state.
    pub fn mark_saved(&mut self) {
        self.log.mark_saved();
    }

    /// Whether there are edits since the last `mark_saved`.
    pub fn is_dirty(&self) -> bool {
        self.log.is_dirty()
    }

    /// Replace the level wholesale (a different save file was opened) and
    /// drop all history; the loaded state becomes the non-undoable baseline.
    pub fn load(&mut self, level: Level) {
        self.level = level;
        self.log.clear();
        self.notify_log_changed();
    }

    /// Send a pre-built record as a logged edit. The convenience methods
    /// above all come through here; callers with their own record-building
    /// logic (e.g. tools composing diffs) use this directly.
    pub fn send(&mut self, record: ChangeRecord) {
        self.dispatch(record, true);
    }

    /// Apply, notify, then log. The single entry point every record passes
    /// through. A record whose precondition check rejects it is dropped
    /// whole: no notification, no log entry, no dirty state.
    fn dispatch(&mut self, record: ChangeRecord, log: bool) {
        if !self.apply(&record) {
            return;
        }
        for observer in &mut self.observers {
            observer.record_applied(&record);
        }
        let record = match self.log.absorb(record) {
            Ok(()) => return,
            Err(record) => record,
        };
        if log {
            self.log.commit(record);
            self.notify_log_changed();
        }
    }

    /// Idempotent forward replay of one record into the level. Returns
    /// whether the record took effect; a rejected record leaves the level
    /// untouched and must not be logged.
    fn apply(&mut self, record: &ChangeRecord) -> bool {
        match record {
            ChangeRecord::Tiles(change) => {
                let layer = match self.level.ensure_layer(change.layer) {
                    Ok(layer) => layer,
                    Err(e) => {
                        warn!(error = %e, "tile change rejected");
                        return false;
                    }
                };
                for (pos, cell) in change.positions.iter().zip(&change.next) {
                    self.level.set_cell(*pos, cell.clone(), layer);
                }
                self.level.recompute_bounds();
                true
            }
            ChangeRecord::LayerMeta(change) => {
                let layer = match self.level.ensure_layer(change.layer) {
                    Ok(layer) => layer,
                    Err(e) => {
                        warn!(error = %e, "metadata change rejected");
                        return false;
                    }
                };
                let meta = self.level.metadata_mut(layer);
                match change.op {
                    MetadataOp::Add => meta.set(change.entry.clone()),
                    MetadataOp::Remove => {
                        meta.remove(change.entry.kind());
                    }
                }
                true
            }
            ChangeRecord::Field(change) => {
                let layer = match self.level.ensure_layer(change.layer) {
                    Ok(layer) => layer,
                    Err(e) => {
                        warn!(error = %e, "field change rejected");
                        return false;
                    }
                };
                let Some(path) = self.level.metadata_mut(layer).path_mut() else {
                    warn!(layer = change.layer, "field change targets a layer without a path");
                    return false;
                };
                match change.field {
                    PathField::Speed => {
                        if let Some(speed) = change.next.as_float() {
                            path.speed = speed;
                        }
                    }
                    PathField::Looped => {
                        if let Some(looped) = change.next.as_bool() {
                            path.looped = looped;
                        }
                    }
                    PathField::Point(index) => {
                        if let Some(point) = value_to_point(&change.next) {
                            if let Some(slot) = path.points.get_mut(index) {
                                *slot = point;
                            }
                        }
                    }
                }
                true
            }
            ChangeRecord::Bundle(bundle) => {
                // A bundle counts as applied if any item took effect; the
                // applied items still need an undo entry.
                let mut any_applied = false;
                for item in &bundle.items {
                    if self.apply(item) {
                        any_applied = true;
                    }
                }
                any_applied
            }
        }
    }

    fn notify_log_changed(&mut self) {
        for observer in &mut self.observers {
            observer.log_changed(&self.log);
        }
    }
}

/// Encode a path point as a two-element value array.
pub fn point_to_value(pos: GridPos) -> Value {
    Value::Array(vec![pos.x.into(), pos.y.into()])
}

fn value_to_point(value: &Value) -> Option<GridPos> {
    match value.as_array()? {
        [x, y] => Some(GridPos::new(x.as_int()? as i32, y.as_int()? as i32)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tileforge_core::{ContentRef, MotionPath};
    use uuid::Uuid;

    fn tile() -> Cell {
        Cell::with_content(ContentRef(Uuid::new_v4()))
    }

    #[test]
    fn test_write_then_undo_restores_empty() {
        let mut projector = Projector::new();
        let cell = tile();
        projector.write(0, vec![GridPos::new(0, 0)], vec![cell.clone()], "place");
        assert_eq!(projector.query(GridPos::new(0, 0), 0), cell);

        projector.undo();
        assert!(projector.query(GridPos::new(0, 0), 0).is_empty());
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut projector = Projector::new();
        let cell = tile();
        projector.write(0, vec![GridPos::new(2, 2)], vec![cell.clone()], "place");

        projector.undo();
        projector.redo();
        assert_eq!(projector.query(GridPos::new(2, 2), 0), cell);
        assert!(projector.log().can_undo());
        assert!(!projector.log().can_redo());
    }

    #[test]
    fn test_negative_layer_write_is_rejected() {
        let mut projector = Projector::new();
        projector.write(-1, vec![GridPos::new(0, 0)], vec![tile()], "bad");
        assert_eq!(projector.level().layer_count(), 0);
        assert!(!projector.log().can_undo());
    }

    #[test]
    fn test_rejected_record_is_not_logged() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut projector = Projector::new();
        projector.add_observer(Box::new(Recorder {
            events: events.clone(),
        }));
        projector.mark_saved();

        let record = ChangeRecord::Tiles(TileChange::new(
            -1,
            vec![GridPos::new(0, 0)],
            vec![Cell::empty()],
            vec![tile()],
            "bad layer",
        ));
        projector.send(record);

        assert_eq!(projector.level().layer_count(), 0);
        assert!(!projector.log().can_undo());
        assert!(!projector.is_dirty());
        assert!(events.borrow().is_empty(), "observers must not see a rejected record");
    }

    #[test]
    fn test_write_grows_layer_list() {
        let mut projector = Projector::new();
        projector.write(3, vec![GridPos::new(0, 0)], vec![tile()], "deep");
        assert_eq!(projector.level().layer_count(), 4);
    }

    #[test]
    fn test_bundle_undoes_as_one_unit() {
        let mut projector = Projector::new();
        let origin = GridPos::new(0, 0);
        let dest = GridPos::new(5, 0);
        let moved = tile();
        projector.write(0, vec![origin], vec![moved.clone()], "place");

        projector.start_bundle("move tile");
        projector.write(0, vec![origin], vec![Cell::empty()], "clear origin");
        projector.write(0, vec![dest], vec![moved.clone()], "set dest");
        projector.end_bundle();

        assert!(projector.query(origin, 0).is_empty());
        assert_eq!(projector.query(dest, 0), moved);
        assert_eq!(projector.log().depth(), 2);

        projector.undo();
        assert_eq!(projector.query(origin, 0), moved);
        assert!(projector.query(dest, 0).is_empty());
    }

    #[test]
    fn test_empty_bundle_logs_nothing() {
        let mut projector = Projector::new();
        projector.start_bundle("noop");
        projector.end_bundle();
        assert!(!projector.log().can_undo());
    }

    #[test]
    fn test_dirty_follows_mark_saved() {
        let mut projector = Projector::new();
        projector.mark_saved();
        assert!(!projector.is_dirty());

        projector.write(0, vec![GridPos::new(1, 1)], vec![tile()], "place");
        assert!(projector.is_dirty());

        projector.undo();
        assert!(!projector.is_dirty());
    }

    #[test]
    fn test_layer_metadata_add_remove_undo() {
        let mut projector = Projector::new();
        let entry = MetadataEntry::Path(MotionPath {
            points: vec![GridPos::new(0, 0), GridPos::new(3, 0)],
            speed: 1.0,
            looped: false,
        });
        projector.set_layer_metadata(0, entry.clone(), "add path");
        assert!(projector.level().metadata(0).unwrap().path().is_some());

        projector.remove_layer_metadata(0, MetadataKind::Path, "remove path");
        assert!(projector.level().metadata(0).unwrap().path().is_none());

        projector.undo();
        assert_eq!(
            projector.level().metadata(0).unwrap().get(MetadataKind::Path),
            Some(&entry)
        );
    }

    #[test]
    fn test_path_field_edit_and_undo() {
        let mut projector = Projector::new();
        projector.set_layer_metadata(
            0,
            MetadataEntry::Path(MotionPath {
                points: vec![GridPos::new(0, 0), GridPos::new(4, 0)],
                speed: 1.0,
                looped: false,
            }),
            "add path",
        );

        projector.set_path_field(0, PathField::Speed, Value::Float(3.5), "speed");
        assert_eq!(projector.level().metadata(0).unwrap().path().unwrap().speed, 3.5);

        projector.set_path_field(
            0,
            PathField::Point(1),
            point_to_value(GridPos::new(4, 6)),
            "move point",
        );
        assert_eq!(
            projector.level().metadata(0).unwrap().path().unwrap().points[1],
            GridPos::new(4, 6)
        );

        projector.undo();
        assert_eq!(
            projector.level().metadata(0).unwrap().path().unwrap().points[1],
            GridPos::new(4, 0)
        );
        projector.undo();
        assert_eq!(projector.level().metadata(0).unwrap().path().unwrap().speed, 1.0);
    }

    #[test]
    fn test_load_replaces_level_and_clears_history() {
        let mut projector = Projector::new();
        projector.write(0, vec![GridPos::new(0, 0)], vec![tile()], "place");

        let mut fresh = Level::new();
        fresh.ensure_layer(0).unwrap();
        let kept = tile();
        fresh.set_cell(GridPos::new(9, 9), kept.clone(), 0);
        fresh.recompute_bounds();

        projector.load(fresh);
        assert_eq!(projector.query(GridPos::new(9, 9), 0), kept);
        assert!(projector.query(GridPos::new(0, 0), 0).is_empty());
        assert!(!projector.log().can_undo());
        assert!(!projector.is_dirty());
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl EditObserver for Recorder {
        fn record_applied(&mut self, record: &ChangeRecord) {
            self.events
                .borrow_mut()
                .push(format!("apply:{}", record.description()));
        }

        fn log_changed(&mut self, log: &ChangeLog) {
            self.events
                .borrow_mut()
                .push(format!("log:{}", log.depth()));
        }
    }

    #[test]
    fn test_observers_see_apply_before_log() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut projector = Projector::new();
        projector.add_observer(Box::new(Recorder {
            events: events.clone(),
        }));

        projector.write(0, vec![GridPos::new(0, 0)], vec![tile()], "place");
        assert_eq!(
            *events.borrow(),
            vec!["apply:place".to_string(), "log:1".to_string()]
        );

        events.borrow_mut().clear();
        projector.undo();
        assert_eq!(
            *events.borrow(),
            vec!["apply:place".to_string(), "log:0".to_string()]
        );
    }
}
