//! End-to-end CRUD walkthrough.
//!
//! Declares a record type, opens an in-memory database, and walks the whole
//! single-table lifecycle: insert, fetch, update, list, delete.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p recordlite-demos --example quickstart
//! ```

use recordlite_core::record;
use recordlite_sqlite::Database;

record! {
    /// One entry of a reading list.
    #[version(1)]
    #[index(finished)]
    pub struct Book {
        pub title: String,
        pub author: String,
        pub pages: i64,
        pub rating: Option<f64>,
        pub finished: bool,
    }
}

fn main() {
    // === Step 1: Open a database and bind the record type ===
    println!("=== Binding ===");
    let db = Database::open_in_memory().unwrap();
    let books = db.table::<Book>().unwrap();
    println!(
        "Bound table '{}' at schema version {}",
        books.name(),
        books.version()
    );

    // === Step 2: Insert some rows ===
    println!("\n=== Inserting ===");
    let mut dune = Book {
        id: None,
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        pages: 412,
        rating: Some(4.5),
        finished: true,
    };
    books.save(&mut dune).unwrap();
    println!("Saved '{}' with id {:?}", dune.title, dune.id);

    let mut sparrow = Book {
        id: None,
        title: "The Sparrow".into(),
        author: "Mary Doria Russell".into(),
        pages: 408,
        rating: None,
        finished: false,
    };
    books.save(&mut sparrow).unwrap();
    println!("Saved '{}' with id {:?}", sparrow.title, sparrow.id);

    // === Step 3: Fetch by identifier ===
    println!("\n=== Fetching ===");
    let fetched = books.get(1).unwrap().unwrap();
    println!(
        "Book 1: {} by {} ({} pages)",
        fetched.title, fetched.author, fetched.pages
    );

    // === Step 4: Update in place ===
    println!("\n=== Updating ===");
    sparrow.finished = true;
    sparrow.rating = Some(4.0);
    books.save(&mut sparrow).unwrap();
    println!("Finished '{}', rated {:?}", sparrow.title, sparrow.rating);

    // === Step 5: List everything ===
    println!("\n=== Listing ===");
    for book in books.all().unwrap() {
        let rating = book
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "unrated".into());
        println!("  #{} {} ({})", book.id.unwrap(), book.title, rating);
    }
    println!("{} rows total", books.count().unwrap());

    // === Step 6: Delete ===
    println!("\n=== Deleting ===");
    books.delete(&dune).unwrap();
    println!("Deleted '{}', {} rows left", dune.title, books.count().unwrap());

    drop(books);
    db.close().unwrap();
    println!("\nDone!");
}
