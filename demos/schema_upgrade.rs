//! Versioned schema migration walkthrough.
//!
//! Runs the same record type through two declared schema versions against
//! one database, the way two releases of a program would. The second
//! binding finds the stored version is older, drops the table, and
//! recreates it empty at the new shape; binding the old declaration after
//! that is refused.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p recordlite-demos --example schema_upgrade
//! ```

use recordlite_sqlite::{CreatedTables, Metadata, Table};
use rusqlite::Connection;

mod release_1 {
    use recordlite_core::record;

    record! {
        /// First release: plain text notes.
        #[version(1)]
        pub struct Note {
            pub text: String,
        }
    }
}

mod release_2 {
    use recordlite_core::record;

    record! {
        /// Second release: notes gained pinning and a timestamp.
        #[version(2)]
        #[index(created_at)]
        pub struct Note {
            pub text: String,
            pub pinned: bool,
            pub created_at: i64,
        }
    }
}

fn main() {
    let conn = Connection::open_in_memory().unwrap();

    // === Step 1: First release creates the table and stores rows ===
    println!("=== Release 1 ===");
    let registry = CreatedTables::new();
    let notes = Table::<release_1::Note>::bind(&conn, &registry).unwrap();
    println!("Bound '{}' at version {}", notes.name(), notes.version());

    for text in ["buy milk", "call home", "water plants"] {
        let mut note = release_1::Note {
            id: None,
            text: text.into(),
        };
        notes.save(&mut note).unwrap();
    }
    println!("Stored {} notes", notes.count().unwrap());

    let mut catalog = Metadata::open(&conn).unwrap();
    catalog.find_by_name("Note").unwrap();
    println!(
        "Catalog version for 'Note': {}",
        catalog.table_version().unwrap()
    );

    // === Step 2: Second release rebinds with the upgraded declaration ===
    // A fresh registry stands in for a process restart.
    println!("\n=== Release 2 ===");
    let registry = CreatedTables::new();
    let notes = Table::<release_2::Note>::bind(&conn, &registry).unwrap();
    println!("Bound '{}' at version {}", notes.name(), notes.version());
    println!(
        "Rows after upgrade: {} (drop and recreate discards data)",
        notes.count().unwrap()
    );

    catalog.find_by_name("Note").unwrap();
    println!(
        "Catalog version for 'Note': {}",
        catalog.table_version().unwrap()
    );

    let mut note = release_2::Note {
        id: None,
        text: "restock fridge".into(),
        pinned: true,
        created_at: 1_756_000_000,
    };
    notes.save(&mut note).unwrap();
    println!("Stored a v2 note with id {:?}", note.id);

    // === Step 3: Downgrades are refused ===
    println!("\n=== Downgrade attempt ===");
    let registry = CreatedTables::new();
    match Table::<release_1::Note>::bind(&conn, &registry) {
        Err(err) => println!("Refused as expected: {err}"),
        Ok(_) => println!("unexpectedly bound the old declaration"),
    }

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM Note", [], |row| row.get(0))
        .unwrap();
    println!("Stored rows are untouched: {remaining}");

    println!("\nDone!");
}
