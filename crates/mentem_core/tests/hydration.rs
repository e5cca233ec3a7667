use mentem_core::{
    hydrate_library, memory_to_markdown, tag_to_markdown, Card, Collection, FsStorage, Library,
    Memory, MemoryKind, Persister, Tag, TagColor,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn fs_library(root: &Path) -> Library {
    Library::new(Persister::on_current_runtime(Arc::new(FsStorage::new(
        root,
    ))))
}

fn write_record(root: &Path, collection: Collection, name: &str, content: &str) {
    let dir = root.join(collection.dir_name());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn hydration_loads_valid_records_and_skips_broken_ones() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    let mut first = Memory::note("first");
    first.id = "a-first".to_string();
    let mut second = Memory::note("second");
    second.id = "c-second".to_string();
    write_record(
        root,
        Collection::Memories,
        "0-broken.md",
        "---\nid: 0-broken\nkind: note\n\nno closing delimiter",
    );
    write_record(root, Collection::Memories, "a-first.md", &memory_to_markdown(&first));
    write_record(
        root,
        Collection::Memories,
        "b-video.md",
        "---\nid: b-video\nkind: video\ncreatedAt: 1\nupdatedAt: 1\n---\n\nclip",
    );
    write_record(root, Collection::Memories, "c-second.md", &memory_to_markdown(&second));
    write_record(root, Collection::Memories, "notes.txt", "ignored");
    write_record(
        root,
        Collection::Tags,
        "t1.md",
        &tag_to_markdown(&Tag {
            id: "t1".to_string(),
            name: "Work".to_string(),
            color: TagColor::Danger,
        }),
    );

    let library = fs_library(root);
    let report = hydrate_library(&library).await;

    assert_eq!(report.memories, 2);
    assert_eq!(report.cards, 0);
    assert_eq!(report.tags, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(library.memories.list(), vec![first, second]);
    assert_eq!(library.tags.get("t1").unwrap().color, TagColor::Danger);
}

#[tokio::test]
async fn records_with_unaddressable_ids_are_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(temp.path());
    write_record(
        storage.root(),
        Collection::Memories,
        "escape.md",
        "---\nid: \"../escape\"\nkind: note\n---\n\nbody",
    );
    write_record(
        storage.root(),
        Collection::Memories,
        "fine.md",
        "---\nid: fine\nkind: note\n---\n\nbody",
    );

    let library = fs_library(storage.root());
    let report = hydrate_library(&library).await;

    assert_eq!(report.memories, 1);
    assert_eq!(report.skipped, 1);
    assert!(library.memories.get("fine").is_some());
}

#[tokio::test]
async fn hydration_creates_missing_collection_directories() {
    let temp = tempfile::tempdir().unwrap();
    let library = fs_library(temp.path());

    let report = hydrate_library(&library).await;

    assert_eq!(report.memories + report.cards + report.tags, 0);
    for collection in Collection::ALL {
        assert!(temp.path().join(collection.dir_name()).is_dir());
    }
}

#[tokio::test]
async fn records_written_in_one_session_hydrate_in_the_next() {
    let temp = tempfile::tempdir().unwrap();

    let card = Card::with_id("card-1", "Capital of France?", "Paris");
    let mut quote = Memory::new(mentem_core::MemoryPayload::Quote {
        text: "Carpe diem".to_string(),
        author: Some("Horace".to_string()),
        source_url: None,
    });
    quote.tldr = Some("seize the day".to_string());
    {
        let library = fs_library(temp.path());
        library.cards.add(card.clone());
        library.memories.add(quote.clone());
        library.tags.add_tag("Latin", None);
        library.settle().await;
    }

    let library = fs_library(temp.path());
    let report = hydrate_library(&library).await;

    assert_eq!(report.skipped, 0);
    assert_eq!(library.cards.list(), vec![card]);
    let loaded = library.memories.get(&quote.id).unwrap();
    assert_eq!(loaded.kind(), MemoryKind::Quote);
    assert_eq!(loaded, quote);
    assert_eq!(library.tags.find_by_name("latin").unwrap().name, "Latin");
}

#[tokio::test]
async fn removing_a_memory_deletes_its_file() {
    let temp = tempfile::tempdir().unwrap();
    let library = fs_library(temp.path());
    let memory = Memory::note("temporary");
    let path = temp
        .path()
        .join(Collection::Memories.dir_name())
        .join(format!("{}.md", memory.id));

    library.memories.add(memory.clone());
    library.settle().await;
    assert!(path.is_file());

    library.memories.remove(&memory.id);
    library.settle().await;
    assert!(!path.exists());
}
