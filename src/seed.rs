//! Sample catalog for local development (`BOOKR_SEED=true`).

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

use crate::core::CatalogResource;
use crate::entities::{
    Author, AuthorCreate, Book, BookCreate, Bundle, BundleCreate, RatingCreate, author,
};
use crate::rateable;

const AUTHORS: &[(&str, &str, &str)] = &[
    ("Jane Austen", "female", "English novelist of the landed gentry."),
    ("H. G. Wells", "male", "Father of science fiction."),
    ("Madeleine L'Engle", "female", "American writer of fiction and poetry."),
];

const BOOKS: &[(usize, &str, &str)] = &[
    (0, "Pride and Prejudice", "A novel of manners."),
    (0, "Emma", "A young woman's misguided matchmaking."),
    (1, "The War of the Worlds", "Martians invade Victorian England."),
    (1, "The Time Machine", "A journey to the year 802,701."),
    (2, "A Wrinkle in Time", "A tesseract through space and time."),
];

/// Inserts the sample catalog unless authors already exist.
///
/// # Errors
///
/// Propagates database failures.
pub async fn run(db: &DatabaseConnection) -> Result<(), DbErr> {
    if author::Entity::find().count(db).await? > 0 {
        tracing::info!("catalog already populated, skipping seed");
        return Ok(());
    }

    let mut authors = Vec::with_capacity(AUTHORS.len());
    for (name, gender, biography) in AUTHORS {
        let author = Author::create(
            db,
            AuthorCreate {
                name: Some((*name).to_owned()),
                gender: Some((*gender).to_owned()),
                biography: Some((*biography).to_owned()),
            },
        )
        .await?;
        authors.push(author);
    }

    let mut books = Vec::with_capacity(BOOKS.len());
    for (author_index, title, description) in BOOKS {
        let book = Book::create(
            db,
            BookCreate {
                title: Some((*title).to_owned()),
                description: Some((*description).to_owned()),
                author_id: Some(authors[*author_index].id),
            },
        )
        .await?;
        books.push(book);
    }

    for (author, value) in authors.iter().zip([5, 4, 5]) {
        rateable::add_rating(db, author, RatingCreate { value: Some(value) }).await?;
    }
    rateable::add_rating(db, &books[0], RatingCreate { value: Some(5) }).await?;

    let bundle = Bundle::create(
        db,
        BundleCreate {
            title: Some("Classics".to_owned()),
            description: Some("Books everyone should read once.".to_owned()),
        },
    )
    .await?;
    for book in &books[..3] {
        Bundle::attach_book(db, bundle.id, book.id).await?;
    }

    tracing::info!(
        authors = authors.len(),
        books = books.len(),
        "seeded sample catalog"
    );
    Ok(())
}
