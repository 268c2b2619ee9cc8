pub mod authors;
pub mod books;

use std::sync::Arc;

use bookstore_db::Database;
use bookstore_kernel::ModuleRegistry;

use authors::{AuthorStoreArc, SqliteAuthorStore};
use books::{BookStoreArc, SqliteBookStore};

/// Register the catalog modules backed by `db`
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    register_stores(
        registry,
        Arc::new(SqliteAuthorStore::new(db.clone())),
        Arc::new(SqliteBookStore::new(db.clone())),
    );
}

/// Register the catalog modules over explicit stores.
///
/// Authors register first so their schema and lifecycle precede books.
pub fn register_stores(
    registry: &mut ModuleRegistry,
    authors: AuthorStoreArc,
    books: BookStoreArc,
) {
    registry.register(authors::create_module(Arc::clone(&authors)));
    registry.register(books::create_module(books, authors));
}
