//! SQL for the member and archive tables.
//!
//! Every function takes a `&mut PgConnection` so it runs equally on a pooled
//! connection or inside a transaction. Rows are returned raw; the repositories
//! turn them into aggregates.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::member::MemberSpec;

// ════════════════════════════════════════════════════════════════════════════════
// Rows
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub shipping_street: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub payment_customer_id: Option<String>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SubscriptionRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub payment_subscription_id: String,
    pub last_invoice_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ArchiveVideoRow {
    pub id: Uuid,
    pub title: String,
    pub show_notes: Option<String>,
    pub video_url: Option<String>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct QuestionRow {
    pub timestamp_seconds: i32,
    pub question_text: String,
}

/// Column values written for a member.
pub(super) struct MemberParams<'a> {
    pub id: Uuid,
    pub user_id: Option<&'a str>,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub shipping_street: Option<&'a str>,
    pub shipping_city: Option<&'a str>,
    pub shipping_state: Option<&'a str>,
    pub shipping_postal_code: Option<&'a str>,
    pub shipping_country: Option<&'a str>,
    pub payment_customer_id: Option<&'a str>,
    pub date_created: DateTime<Utc>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Members
// ════════════════════════════════════════════════════════════════════════════════

enum SpecKey<'a> {
    Id(Uuid),
    Text(&'a str),
}

/// FROM/WHERE clause selecting the members a spec matches.
fn spec_filter(spec: &MemberSpec) -> (&'static str, SpecKey<'_>) {
    match spec {
        MemberSpec::ById(id) => ("FROM members m WHERE m.id = $1", SpecKey::Id(*id.as_uuid())),
        MemberSpec::ByEmail(email) => (
            "FROM members m WHERE lower(m.email) = lower($1)",
            SpecKey::Text(email),
        ),
        MemberSpec::ByUserId(user_id) => (
            "FROM members m WHERE m.user_id = $1",
            SpecKey::Text(user_id.as_str()),
        ),
        MemberSpec::ByPaymentCustomerId(id) => (
            "FROM members m WHERE m.payment_customer_id = $1",
            SpecKey::Text(id),
        ),
        MemberSpec::ByPaymentSubscriptionId(id) => (
            "FROM members m JOIN subscriptions s ON s.member_id = m.id \
             WHERE s.payment_subscription_id = $1",
            SpecKey::Text(id),
        ),
    }
}

fn lock_member_id_sql(spec: &MemberSpec) -> String {
    let (filter, _) = spec_filter(spec);
    format!(
        "SELECT m.id {} ORDER BY m.date_created LIMIT 1 FOR UPDATE OF m",
        filter
    )
}

/// Id of the first member matching `spec`. The row stays locked until the
/// surrounding transaction ends.
pub(super) async fn lock_member_id(
    conn: &mut PgConnection,
    spec: &MemberSpec,
) -> Result<Option<Uuid>, sqlx::Error> {
    let sql = lock_member_id_sql(spec);
    let query = sqlx::query_scalar::<_, Uuid>(&sql);
    let query = match spec_filter(spec).1 {
        SpecKey::Id(id) => query.bind(id),
        SpecKey::Text(text) => query.bind(text),
    };
    query.fetch_optional(conn).await
}

pub(super) async fn fetch_member(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<MemberRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, user_id, email, first_name, last_name, address,
               shipping_street, shipping_city, shipping_state, shipping_postal_code,
               shipping_country, payment_customer_id, date_created
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub(super) async fn fetch_subscriptions(
    conn: &mut PgConnection,
    member_id: Uuid,
) -> Result<Vec<SubscriptionRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT s.id, s.member_id, s.payment_subscription_id, s.last_invoice_id,
               d.start_date, d.end_date
        FROM subscriptions s
        JOIN subscription_dates d ON d.subscription_id = s.id
        WHERE s.member_id = $1
        ORDER BY d.start_date
        "#,
    )
    .bind(member_id)
    .fetch_all(conn)
    .await
}

pub(super) async fn fetch_books_read(
    conn: &mut PgConnection,
    member_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT book_id FROM book_members WHERE member_id = $1 ORDER BY created_at, book_id",
    )
    .bind(member_id)
    .fetch_all(conn)
    .await
}

pub(super) async fn upsert_member(
    conn: &mut PgConnection,
    member: &MemberParams<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO members (
            id, user_id, email, first_name, last_name, address,
            shipping_street, shipping_city, shipping_state, shipping_postal_code,
            shipping_country, payment_customer_id, date_created
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (id) DO UPDATE SET
            user_id = EXCLUDED.user_id,
            email = EXCLUDED.email,
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            address = EXCLUDED.address,
            shipping_street = EXCLUDED.shipping_street,
            shipping_city = EXCLUDED.shipping_city,
            shipping_state = EXCLUDED.shipping_state,
            shipping_postal_code = EXCLUDED.shipping_postal_code,
            shipping_country = EXCLUDED.shipping_country,
            payment_customer_id = EXCLUDED.payment_customer_id
        "#,
    )
    .bind(member.id)
    .bind(member.user_id)
    .bind(member.email)
    .bind(member.first_name)
    .bind(member.last_name)
    .bind(member.address)
    .bind(member.shipping_street)
    .bind(member.shipping_city)
    .bind(member.shipping_state)
    .bind(member.shipping_postal_code)
    .bind(member.shipping_country)
    .bind(member.payment_customer_id)
    .bind(member.date_created)
    .execute(conn)
    .await?;

    Ok(())
}

/// Writes a subscription and its dates row.
pub(super) async fn upsert_subscription(
    conn: &mut PgConnection,
    id: Uuid,
    member_id: Uuid,
    payment_subscription_id: &str,
    last_invoice_id: Option<&str>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO subscriptions (id, member_id, payment_subscription_id, last_invoice_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE SET last_invoice_id = EXCLUDED.last_invoice_id
        "#,
    )
    .bind(id)
    .bind(member_id)
    .bind(payment_subscription_id)
    .bind(last_invoice_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO subscription_dates (subscription_id, start_date, end_date)
        VALUES ($1, $2, $3)
        ON CONFLICT (subscription_id) DO UPDATE SET
            start_date = EXCLUDED.start_date,
            end_date = EXCLUDED.end_date
        "#,
    )
    .bind(id)
    .bind(start_date)
    .bind(end_date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(super) async fn insert_book_read(
    conn: &mut PgConnection,
    member_id: Uuid,
    book_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO book_members (book_id, member_id)
        VALUES ($1, $2)
        ON CONFLICT (book_id, member_id) DO NOTHING
        "#,
    )
    .bind(book_id)
    .bind(member_id)
    .execute(conn)
    .await?;

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Archive
// ════════════════════════════════════════════════════════════════════════════════

pub(super) async fn insert_archive_video(
    conn: &mut PgConnection,
    row: &ArchiveVideoRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO archive_videos (id, title, show_notes, video_url, date_created)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(row.id)
    .bind(&row.title)
    .bind(&row.show_notes)
    .bind(&row.video_url)
    .bind(row.date_created)
    .execute(conn)
    .await?;

    Ok(())
}

pub(super) async fn insert_question(
    conn: &mut PgConnection,
    video_id: Uuid,
    position: i32,
    question: &QuestionRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO questions (archive_video_id, position, timestamp_seconds, question_text)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(video_id)
    .bind(position)
    .bind(question.timestamp_seconds)
    .bind(&question.question_text)
    .execute(conn)
    .await?;

    Ok(())
}

pub(super) async fn fetch_archive_video(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<ArchiveVideoRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, title, show_notes, video_url, date_created FROM archive_videos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub(super) async fn fetch_archive_video_by_title(
    conn: &mut PgConnection,
    title: &str,
) -> Result<Option<ArchiveVideoRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, title, show_notes, video_url, date_created
        FROM archive_videos
        WHERE title = $1
        ORDER BY date_created
        LIMIT 1
        "#,
    )
    .bind(title)
    .fetch_optional(conn)
    .await
}

pub(super) async fn fetch_questions(
    conn: &mut PgConnection,
    video_id: Uuid,
) -> Result<Vec<QuestionRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT timestamp_seconds, question_text
        FROM questions
        WHERE archive_video_id = $1
        ORDER BY timestamp_seconds, position
        "#,
    )
    .bind(video_id)
    .fetch_all(conn)
    .await
}
