//! End-to-end editing scenarios driving the projector the way editor tools do

use tileforge_editor::{PathField, Projector};
use tileforge_core::{
    Cell, ContentDesc, ContentRef, ContentTable, GridPos, GridRect, Level, LevelFile,
    MetadataEntry, MotionPath, Value,
};
use uuid::Uuid;

fn tile() -> Cell {
    Cell::with_content(ContentRef(Uuid::new_v4()))
}

#[test]
fn place_undo_leaves_cell_empty() {
    let mut projector = Projector::new();
    projector.write(0, vec![GridPos::new(0, 0)], vec![tile()], "place");

    projector.undo();
    assert!(projector.query(GridPos::new(0, 0), 0).is_empty());
    assert!(!projector.log().can_undo());
    assert!(projector.log().can_redo());
}

#[test]
fn bundled_move_restores_both_cells_in_one_undo() {
    let mut projector = Projector::new();
    let origin = GridPos::new(2, 2);
    let dest = GridPos::new(7, 2);
    let moved = tile();
    projector.write(0, vec![origin], vec![moved.clone()], "place");
    projector.mark_saved();

    projector.start_bundle("move");
    projector.write(0, vec![origin], vec![Cell::empty()], "clear");
    projector.write(0, vec![dest], vec![moved.clone()], "drop");
    projector.end_bundle();

    projector.undo();
    assert_eq!(projector.query(origin, 0), moved);
    assert!(projector.query(dest, 0).is_empty());
    assert!(!projector.is_dirty());

    // Redo replays the whole bundle as one unit too.
    projector.redo();
    assert!(projector.query(origin, 0).is_empty());
    assert_eq!(projector.query(dest, 0), moved);
}

#[test]
fn dirty_flag_follows_save_point_through_undo() {
    let mut projector = Projector::new();
    projector.mark_saved();
    projector.write(0, vec![GridPos::new(1, 0)], vec![tile()], "place");
    assert!(projector.is_dirty());

    projector.undo();
    assert!(!projector.is_dirty());

    projector.redo();
    assert!(projector.is_dirty());
}

#[test]
fn redo_stack_clears_on_new_logged_edit() {
    let mut projector = Projector::new();
    projector.write(0, vec![GridPos::new(0, 0)], vec![tile()], "a");
    projector.write(0, vec![GridPos::new(1, 0)], vec![tile()], "b");
    projector.undo();
    assert!(projector.log().can_redo());

    projector.write(0, vec![GridPos::new(2, 0)], vec![tile()], "c");
    assert!(!projector.log().can_redo());
    assert_eq!(projector.log().undo_description(), Some("c"));
}

#[test]
fn multi_layer_stroke_replays_identically_after_undo_redo() {
    let mut projector = Projector::new();
    let ground: Vec<GridPos> = (0..6).map(|x| GridPos::new(x, 0)).collect();
    let ground_cells: Vec<Cell> = ground.iter().map(|_| tile()).collect();
    projector.write(0, ground.clone(), ground_cells.clone(), "ground stroke");

    let deco = tile();
    projector.write(2, vec![GridPos::new(3, -1)], vec![deco.clone()], "deco");
    assert_eq!(projector.level().layer_count(), 3);
    assert_eq!(
        projector.bounds(),
        GridRect::spanning(GridPos::new(0, -1), GridPos::new(5, 0))
    );

    projector.undo();
    projector.undo();
    assert!(projector.bounds().is_empty());

    projector.redo();
    projector.redo();
    for (pos, cell) in ground.iter().zip(&ground_cells) {
        assert_eq!(&projector.query(*pos, 0), cell);
    }
    assert_eq!(projector.query(GridPos::new(3, -1), 2), deco);
    assert_eq!(projector.query(GridPos::new(3, -1), 9), Cell::empty());
}

#[test]
fn applying_an_edit_and_undoing_it_is_observably_identity() {
    let mut projector = Projector::new();
    projector.write(0, vec![GridPos::new(4, 4)], vec![tile()], "base");
    let baseline = projector.level().clone();

    // Overwrite an occupied cell and a fresh one in a single edit.
    projector.write(
        0,
        vec![GridPos::new(4, 4), GridPos::new(5, 4)],
        vec![tile(), tile()],
        "stamp",
    );
    projector.undo();

    assert_eq!(projector.level(), &baseline);
}

#[test]
fn path_edits_survive_save_and_reload() {
    let mut table = ContentTable::new();
    let stone = table.register(ContentDesc::new("stone").with_solid(true));

    let mut projector = Projector::new();
    projector.write(
        1,
        vec![GridPos::new(0, 0), GridPos::new(1, 0)],
        vec![Cell::with_content(stone), Cell::with_content(stone)],
        "platform",
    );
    projector.set_layer_metadata(
        1,
        MetadataEntry::Path(MotionPath {
            points: vec![GridPos::new(0, 0), GridPos::new(0, 4)],
            speed: 1.0,
            looped: true,
        }),
        "add path",
    );
    projector.set_path_field(1, PathField::Speed, Value::Float(2.5), "tune speed");

    let file = LevelFile::from_level(projector.level(), &table);
    let reloaded: Level = file.to_level(&table);

    let path = reloaded.metadata(1).unwrap().path().unwrap();
    assert_eq!(path.speed, 2.5);
    assert!(path.looped);
    assert_eq!(reloaded.cell_at(GridPos::new(1, 0), 1).content, Some(stone));

    // Loading a different file resets the editing session.
    projector.load(reloaded);
    assert!(!projector.is_dirty());
    assert!(!projector.log().can_undo());
}
