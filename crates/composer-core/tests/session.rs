//! End-to-end editing sessions.

use std::sync::Arc;

use composer_blocks::{Block, BlockKind, registry};
use composer_core::{
    Clipboard, Composer, Config, Document, DocumentStore, DropOutcome, FileStore, MemoryStore,
    MoveDirection,
};
use proptest::prelude::*;

fn kinds(doc: &Document) -> Vec<BlockKind> {
    doc.blocks().iter().map(Block::kind).collect()
}

#[test]
fn test_move_then_undo_three_times() {
    let mut composer = Composer::new(Config::default(), Arc::new(MemoryStore::new()));

    let paragraph = composer.add_block("paragraph", 0).unwrap();
    composer.add_block("image", 1).unwrap();
    assert!(composer.move_block(&paragraph, MoveDirection::Down).unwrap());
    assert_eq!(
        kinds(composer.document()),
        vec![BlockKind::Image, BlockKind::Paragraph]
    );

    assert!(composer.undo().unwrap());
    assert_eq!(
        kinds(composer.document()),
        vec![BlockKind::Paragraph, BlockKind::Image]
    );
    assert!(composer.undo().unwrap());
    assert_eq!(kinds(composer.document()), vec![BlockKind::Paragraph]);
    assert!(composer.undo().unwrap());
    assert!(composer.document().is_empty());
    assert!(!composer.undo().unwrap());

    // And all the way forward again
    while composer.redo().unwrap() {}
    assert_eq!(
        kinds(composer.document()),
        vec![BlockKind::Image, BlockKind::Paragraph]
    );
}

#[test]
fn test_long_session_undoes_back_to_empty() {
    let mut composer = Composer::new(Config::default(), Arc::new(MemoryStore::new()));
    for i in 0..150 {
        composer.add_block("divider", i).unwrap();
    }
    assert_eq!(composer.document().len(), 150);

    let mut undos = 0;
    while composer.undo().unwrap() {
        undos += 1;
    }
    assert_eq!(undos, 150);
    assert!(composer.document().is_empty());

    while composer.redo().unwrap() {}
    assert_eq!(composer.document().len(), 150);
}

#[test]
fn test_unknown_type_pushes_no_history() {
    let mut composer = Composer::new(Config::default(), Arc::new(MemoryStore::new()));
    composer.add_block("heading", 0).unwrap();
    let before = composer.document().blocks().to_vec();

    assert!(composer.add_block("bogus", 0).is_err());
    assert_eq!(composer.document().blocks(), before.as_slice());

    // One undo still lands on the empty document
    assert!(composer.undo().unwrap());
    assert!(composer.document().is_empty());
}

#[test]
fn test_drag_reorder_matches_repeated_moves() {
    let build = || {
        let mut composer = Composer::new(Config::default(), Arc::new(MemoryStore::new()));
        for key in ["heading", "paragraph", "image", "quote"] {
            let len = composer.document().len();
            composer.add_block(key, len).unwrap();
        }
        composer
    };

    let mut dragged = build();
    let quote = dragged.document().blocks()[3].id.clone();
    let pass = dragged.view().bindings.pass();
    assert!(dragged.start_block_drag(pass, &format!("handle:{}", quote)));
    assert_eq!(
        dragged.drop_on(pass, Some("zone:1")).unwrap(),
        DropOutcome::Moved(quote.clone())
    );

    let mut stepped = build();
    let quote = stepped.document().blocks()[3].id.clone();
    stepped.move_block(&quote, MoveDirection::Up).unwrap();
    stepped.move_block(&quote, MoveDirection::Up).unwrap();

    assert_eq!(kinds(dragged.document()), kinds(stepped.document()));
}

#[test]
fn test_copy_paste_across_sessions() {
    let mut clipboard = Clipboard::new();

    let mut source = Composer::new(Config::default(), Arc::new(MemoryStore::new()));
    let id = source.add_block("button", 0).unwrap();
    source.update_block_content(&id, "text", "Buy now").unwrap();
    source.copy_block(&mut clipboard).unwrap();

    let mut target = Composer::new(Config::default(), Arc::new(MemoryStore::new()));
    let pasted = target.paste_block(&clipboard).unwrap().unwrap();
    assert_ne!(pasted, id);
    assert!(target.export_markup().contains("Buy now"));
}

#[tokio::test]
async fn test_file_store_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(dir.path()));

    let mut composer = Composer::new(Config::default(), Arc::clone(&store));
    composer.set_title("Spring sale").unwrap();
    let heading = composer.add_block("heading", 0).unwrap();
    composer
        .update_block_content(&heading, "text", "Everything must go")
        .unwrap();
    composer.add_block("columns", 1).unwrap();
    composer.set_footer("<p>Contact us</p>").unwrap();
    let id = composer.save().await.unwrap();

    // A fresh store over the same directory sees the record
    let reopened_store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(dir.path()));
    let summaries = reopened_store.list().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].title, "Spring sale");

    let reopened = Composer::open(Config::default(), reopened_store, Some(id.clone())).await;
    assert_eq!(reopened.document_id(), Some(&id));
    assert_eq!(reopened.document().blocks(), composer.document().blocks());
    assert_eq!(reopened.document().footer(), "<p>Contact us</p>");
    assert!(!reopened.document().can_undo());
    assert_eq!(reopened.export_markup(), composer.export_markup());
}

#[derive(Debug, Clone)]
enum Op {
    Add { kind: usize, at: usize },
    Delete { at: usize },
    Duplicate { at: usize },
    Move { at: usize, up: bool },
    MoveTo { at: usize, zone: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..registry::all().len(), 0..8usize).prop_map(|(kind, at)| Op::Add { kind, at }),
        (0..8usize).prop_map(|at| Op::Delete { at }),
        (0..8usize).prop_map(|at| Op::Duplicate { at }),
        (0..8usize, any::<bool>()).prop_map(|(at, up)| Op::Move { at, up }),
        (0..8usize, 0..9usize).prop_map(|(at, zone)| Op::MoveTo { at, zone }),
    ]
}

/// Applies `op`, returning true if the document changed.
fn apply(doc: &mut Document, op: &Op) -> bool {
    let id_at = |doc: &Document, at: usize| doc.blocks().get(at).map(|b| b.id.clone());

    match *op {
        Op::Add { kind, at } => doc.add_block(registry::all()[kind].key, at).is_ok(),
        Op::Delete { at } => match id_at(doc, at) {
            Some(id) => doc.delete_block(&id).is_ok(),
            None => false,
        },
        Op::Duplicate { at } => match id_at(doc, at) {
            Some(id) => doc.duplicate_block(&id).is_ok(),
            None => false,
        },
        Op::Move { at, up } => match id_at(doc, at) {
            Some(id) => {
                let direction = if up {
                    MoveDirection::Up
                } else {
                    MoveDirection::Down
                };
                doc.move_block(&id, direction).unwrap_or(false)
            }
            None => false,
        },
        Op::MoveTo { at, zone } => match id_at(doc, at) {
            Some(id) => doc.move_block_to(&id, zone).unwrap_or(false),
            None => false,
        },
    }
}

proptest! {
    #[test]
    fn prop_undo_redo_walks_every_state(ops in prop::collection::vec(op(), 1..40)) {
        let mut doc = Document::default();
        let mut states = vec![doc.blocks().to_vec()];

        for op in &ops {
            if apply(&mut doc, op) {
                states.push(doc.blocks().to_vec());
            }
        }

        for expected in states.iter().rev().skip(1) {
            prop_assert!(doc.undo());
            prop_assert_eq!(doc.blocks(), expected.as_slice());
        }
        prop_assert!(!doc.undo());

        for expected in states.iter().skip(1) {
            prop_assert!(doc.redo());
            prop_assert_eq!(doc.blocks(), expected.as_slice());
        }
        prop_assert!(!doc.redo());
    }

    #[test]
    fn prop_selection_always_points_at_a_block(ops in prop::collection::vec(op(), 1..30)) {
        let mut doc = Document::default();
        for op in &ops {
            apply(&mut doc, op);
            if let Some(id) = doc.selected() {
                prop_assert!(doc.index_of(id).is_some());
            }
        }
        while doc.undo() {
            if let Some(id) = doc.selected() {
                prop_assert!(doc.index_of(id).is_some());
            }
        }
    }
}
