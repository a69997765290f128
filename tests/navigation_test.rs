//! End-to-end navigation over an on-disk vault: settings file, directory
//! indexing, and composed multi-view rendering in one shared session.

mod common;

use common::{init_logging, write_settings, write_vault};
use stemma_core::config::Settings;
use stemma_core::index::{InMemoryIndex, MetadataIndex};
use stemma_core::node::NoteNode;
use stemma_core::tree::TreeRef;
use stemma_core::views::NoteNavigator;
use tempfile::TempDir;

const SETTINGS: &str = r#"
[display]
title_property = "title"
glyph_property = "glyph"
show_glyphs = true

[[relationship]]
key = "parent"
primary_role = "parent"
primary_property = "entry-parents"
complementary_role = "child"
complementary_property = "entry-children"
categories = ["superordinate"]

[[relationship]]
key = "related"
primary_role = "related"
primary_property = "entry-related"
complementary_role = "related"
complementary_property = "entry-related"
categories = ["symmetrical"]
"#;

fn sample_vault(temp: &TempDir) -> InMemoryIndex {
    let root = write_vault(
        temp,
        &[
            (
                "areas/engineering.md",
                "---\ntitle: Engineering\nglyph: \"#\"\n---\n\nTop-level area.\n",
            ),
            (
                "projects/widget.md",
                "---\ntitle: Widget Project\nentry-parents: \"[[engineering]]\"\nentry-related: \"[[gadget]]\"\n---\n\nSee also [[gadget]].\n",
            ),
            (
                "projects/gadget.md",
                "---\ntitle: Gadget Project\nentry-parents: \"[[engineering]]\"\n---\n",
            ),
            (
                "notes/widget-log.md",
                "---\nentry-parents: \"[[widget|The Widget]]\"\n---\n\nProgress notes for [[widget]].\n",
            ),
        ],
    );
    InMemoryIndex::from_dir(root).unwrap()
}

fn tree_paths(tree: &TreeRef<NoteNode>) -> Vec<String> {
    tree.iter_pre_order().map(|n| n.value().path()).collect()
}

#[test]
fn directory_vault_indexes_and_normalizes() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let index = sample_vault(&temp);

    assert_eq!(index.len(), 4);
    let record = index.record("notes/widget-log.md").unwrap().unwrap();
    assert_eq!(
        record.path_list("entry-parents", None),
        vec!["projects/widget.md".to_string()]
    );
    // Body link resolved across folders too.
    assert_eq!(
        index.inbound_document_links("projects/gadget.md").unwrap(),
        vec!["projects/widget.md".to_string()]
    );
}

#[test]
fn composed_views_share_one_session() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let index = sample_vault(&temp);

    let settings = Settings::load(write_settings(&temp, SETTINGS)).unwrap();
    let catalog = settings.catalog().unwrap();
    let hierarchy = catalog.superordinate();
    let symmetric = catalog.symmetrical();

    let nav = NoteNavigator::new(&index, &settings.display);
    let session = nav.session();

    // Ancestors of the log note, focal subtree expanded.
    let roots = nav.ancestor_view_in(
        &session,
        "notes/widget-log.md",
        &hierarchy,
        None,
        true,
        None,
    );
    assert_eq!(roots.len(), 1);
    assert_eq!(
        tree_paths(&roots[0]),
        vec![
            "areas/engineering.md".to_string(),
            "projects/widget.md".to_string(),
            "notes/widget-log.md".to_string(),
        ]
    );

    // The engineering area lists both projects below it.
    let down = nav.descendant_view_in(&session, "areas/engineering.md", &hierarchy, Some(1));
    let mut kids: Vec<String> = down.children().iter().map(|c| c.value().path()).collect();
    kids.sort();
    assert_eq!(
        kids,
        vec![
            "projects/gadget.md".to_string(),
            "projects/widget.md".to_string()
        ]
    );

    // Coordinates of the widget project: its declared related note, expanded
    // with that note's own descendants.
    let coords = nav.coordinate_view_in(
        &session,
        "projects/widget.md",
        &symmetric,
        &hierarchy,
        None,
    );
    let neighbors: Vec<String> = coords.children().iter().map(|c| c.value().path()).collect();
    assert_eq!(neighbors, vec!["projects/gadget.md".to_string()]);

    // Structural backlinks on the gadget project come from widget's body.
    let backlinks = nav.backlink_view_in(&session, "projects/gadget.md");
    assert_eq!(backlinks.len(), 1);
    assert_eq!(backlinks[0].value().path(), "projects/widget.md");
    assert!(backlinks[0].is_leaf());

    assert!(!session.index_unavailable());
}

#[test]
fn display_text_uses_titles_aliases_and_glyphs() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let index = sample_vault(&temp);
    let settings = Settings::load(write_settings(&temp, SETTINGS)).unwrap();
    let catalog = settings.catalog().unwrap();

    let nav = NoteNavigator::new(&index, &settings.display);
    let session = nav.session();
    let roots = nav.ancestor_view_in(
        &session,
        "notes/widget-log.md",
        &catalog.superordinate(),
        None,
        false,
        None,
    );

    let engineering = roots[0].value();
    assert_eq!(engineering.display_text(&session), "# Engineering");

    // Titles outrank the alias carried by the link from the log note.
    let widget = roots[0].children()[0].value();
    assert_eq!(widget.alias().as_deref(), Some("The Widget"));
    assert_eq!(widget.display_text(&session), "Widget Project");

    // The ledger carries directional tags for UI glyph selection.
    let ledger = roots[0].children()[0].children()[0].value().relationships();
    let tags = ledger.get("projects/widget.md").unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].relationship, "parent");
    assert!(!tags[0].inbound);
}

#[test]
fn rerendering_is_stable_across_sessions() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let index = sample_vault(&temp);
    let settings = Settings::load(write_settings(&temp, SETTINGS)).unwrap();
    let hierarchy = settings.catalog().unwrap().superordinate();

    let nav = NoteNavigator::new(&index, &settings.display);
    let first = nav.descendant_view("areas/engineering.md", &hierarchy, None);
    let second = nav.descendant_view("areas/engineering.md", &hierarchy, None);
    assert_eq!(tree_paths(&first), tree_paths(&second));
}
