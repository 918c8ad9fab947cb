//! PostgreSQL entity store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, Transaction};

use super::{EntityStore, StoreTx};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRegistration, BookStatus, CategoryType, EntityId, EntityKind, EntityRef},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    author: String,
    title: String,
    description: Option<String>,
    category_type_id: Option<i64>,
    book_registration_ids: Vec<i64>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: Some(row.id),
            author: row.author,
            title: row.title,
            description: row.description,
            category_type: row.category_type_id.map(EntityRef::new),
            book_registrations: row.book_registration_ids.into_iter().map(EntityRef::new).collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryTypeRow {
    id: i64,
    title: String,
    description: Option<String>,
    book_ids: Vec<i64>,
}

impl From<CategoryTypeRow> for CategoryType {
    fn from(row: CategoryTypeRow) -> Self {
        CategoryType {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            books: row.book_ids.into_iter().map(EntityRef::new).collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct BookRegistrationRow {
    id: i64,
    student_id: Option<String>,
    request_date: Option<DateTime<Utc>>,
    request_status: Option<String>,
    return_date: Option<DateTime<Utc>>,
    remarks: Option<String>,
    book_id: Option<i64>,
}

impl TryFrom<BookRegistrationRow> for BookRegistration {
    type Error = AppError;

    fn try_from(row: BookRegistrationRow) -> Result<Self, Self::Error> {
        let request_status = row
            .request_status
            .as_deref()
            .map(str::parse::<BookStatus>)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(BookRegistration {
            id: Some(row.id),
            student_id: row.student_id,
            request_date: row.request_date,
            request_status,
            return_date: row.return_date,
            remarks: row.remarks,
            book: row.book_id.map(EntityRef::new),
        })
    }
}

fn ids(refs: impl IntoIterator<Item = EntityRef>) -> Vec<i64> {
    refs.into_iter().map(|r| r.id).collect()
}

fn require_id(kind: EntityKind, id: Option<EntityId>) -> AppResult<EntityId> {
    id.ok_or_else(|| AppError::Internal(format!("cannot store {} without an id", kind)))
}

#[async_trait]
impl StoreTx for PgTx {
    async fn get_book(&mut self, id: EntityId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>("SELECT * FROM book WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn get_category_type(&mut self, id: EntityId) -> AppResult<Option<CategoryType>> {
        let row = sqlx::query_as::<_, CategoryTypeRow>("SELECT * FROM category_type WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(CategoryType::from))
    }

    async fn get_book_registration(&mut self, id: EntityId) -> AppResult<Option<BookRegistration>> {
        sqlx::query_as::<_, BookRegistrationRow>("SELECT * FROM book_registration WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .map(BookRegistration::try_from)
            .transpose()
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM book ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn list_category_types(&mut self) -> AppResult<Vec<CategoryType>> {
        let rows = sqlx::query_as::<_, CategoryTypeRow>("SELECT * FROM category_type ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(CategoryType::from).collect())
    }

    async fn list_book_registrations(&mut self) -> AppResult<Vec<BookRegistration>> {
        let rows = sqlx::query_as::<_, BookRegistrationRow>("SELECT * FROM book_registration ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        rows.into_iter().map(BookRegistration::try_from).collect()
    }

    async fn exists(&mut self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
        let exists: bool = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists)
    }

    async fn owners_listing(&mut self, child_kind: EntityKind, child: EntityId) -> AppResult<Vec<EntityId>> {
        let query = match child_kind {
            EntityKind::Book => "SELECT id FROM category_type WHERE $1 = ANY(book_ids) ORDER BY id",
            EntityKind::BookRegistration => "SELECT id FROM book WHERE $1 = ANY(book_registration_ids) ORDER BY id",
            EntityKind::CategoryType => return Ok(Vec::new()),
        };
        let owners: Vec<i64> = sqlx::query_scalar(query)
            .bind(child)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(owners)
    }

    async fn next_id(&mut self) -> AppResult<EntityId> {
        let id: i64 = sqlx::query_scalar("SELECT nextval('entity_id_seq')")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(id)
    }

    async fn upsert_book(&mut self, book: &Book) -> AppResult<()> {
        let id = require_id(EntityKind::Book, book.id)?;
        sqlx::query(
            r#"
            INSERT INTO book (id, author, title, description, category_type_id, book_registration_ids)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                author = EXCLUDED.author,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                category_type_id = EXCLUDED.category_type_id,
                book_registration_ids = EXCLUDED.book_registration_ids
            "#,
        )
        .bind(id)
        .bind(&book.author)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.category_type.map(|r| r.id))
        .bind(ids(book.book_registrations.iter().copied()))
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn upsert_category_type(&mut self, category_type: &CategoryType) -> AppResult<()> {
        let id = require_id(EntityKind::CategoryType, category_type.id)?;
        sqlx::query(
            r#"
            INSERT INTO category_type (id, title, description, book_ids)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                book_ids = EXCLUDED.book_ids
            "#,
        )
        .bind(id)
        .bind(&category_type.title)
        .bind(&category_type.description)
        .bind(ids(category_type.books.iter().copied()))
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn upsert_book_registration(&mut self, registration: &BookRegistration) -> AppResult<()> {
        let id = require_id(EntityKind::BookRegistration, registration.id)?;
        sqlx::query(
            r#"
            INSERT INTO book_registration
                (id, student_id, request_date, request_status, return_date, remarks, book_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                student_id = EXCLUDED.student_id,
                request_date = EXCLUDED.request_date,
                request_status = EXCLUDED.request_status,
                return_date = EXCLUDED.return_date,
                remarks = EXCLUDED.remarks,
                book_id = EXCLUDED.book_id
            "#,
        )
        .bind(id)
        .bind(&registration.student_id)
        .bind(registration.request_date)
        .bind(registration.request_status.map(|s| s.as_str()))
        .bind(registration.return_date)
        .bind(&registration.remarks)
        .bind(registration.book.map(|r| r.id))
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, kind: EntityKind, id: EntityId) -> AppResult<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        sqlx::query(&query).bind(id).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
