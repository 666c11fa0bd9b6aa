//! PostgreSQL implementation of MemberRepository.
//!
//! A unit of work is one database transaction. `lock_one` takes a
//! `SELECT ... FOR UPDATE` on the member row, so concurrent webhooks for the
//! same member apply one after the other.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    BookId, DateTimeRange, DomainError, ErrorCode, MemberId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::member::{Address, Member, MemberSpec, Subscription};
use crate::ports::{MemberRepository, MemberUnitOfWork};

use super::queries::{self, MemberParams, MemberRow, SubscriptionRow};

/// PostgreSQL implementation of the MemberRepository port.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;
        Ok(Box::new(PgMemberUnitOfWork { tx }))
    }
}

/// Member unit of work backed by a transaction. Dropping it rolls back.
pub struct PgMemberUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MemberUnitOfWork for PgMemberUnitOfWork {
    async fn lock_one(&mut self, spec: &MemberSpec) -> Result<Option<Member>, DomainError> {
        let id = queries::lock_member_id(&mut self.tx, spec)
            .await
            .map_err(|e| db_error("Failed to lock member", e))?;

        match id {
            Some(id) => load_member(&mut self.tx, id).await,
            None => Ok(None),
        }
    }

    async fn save(&mut self, member: &Member) -> Result<(), DomainError> {
        let shipping = member.shipping_address.as_ref();
        let params = MemberParams {
            id: *member.id.as_uuid(),
            user_id: member.user_id.as_ref().map(|u| u.as_str()),
            email: &member.email,
            first_name: member.first_name.as_deref(),
            last_name: member.last_name.as_deref(),
            address: member.address.as_deref(),
            shipping_street: shipping.map(|a| a.street.as_str()),
            shipping_city: shipping.map(|a| a.city.as_str()),
            shipping_state: shipping.map(|a| a.state.as_str()),
            shipping_postal_code: shipping.map(|a| a.postal_code.as_str()),
            shipping_country: shipping.map(|a| a.country.as_str()),
            payment_customer_id: member.payment_customer_id.as_deref(),
            date_created: *member.date_created.as_datetime(),
        };

        queries::upsert_member(&mut self.tx, &params)
            .await
            .map_err(|e| db_error("Failed to save member", e))?;

        for subscription in &member.subscriptions {
            queries::upsert_subscription(
                &mut self.tx,
                *subscription.id.as_uuid(),
                *member.id.as_uuid(),
                &subscription.payment_subscription_id,
                subscription.last_invoice_id.as_deref(),
                *subscription.dates.start().as_datetime(),
                subscription.dates.end().map(|end| *end.as_datetime()),
            )
            .await
            .map_err(|e| db_error("Failed to save subscription", e))?;
        }

        for book_id in &member.books_read {
            queries::insert_book_read(&mut self.tx, *member.id.as_uuid(), *book_id.as_uuid())
                .await
                .map_err(|e| db_error("Failed to save books read", e))?;
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

async fn load_member(conn: &mut PgConnection, id: Uuid) -> Result<Option<Member>, DomainError> {
    let Some(row) = queries::fetch_member(&mut *conn, id)
        .await
        .map_err(|e| db_error("Failed to load member", e))?
    else {
        return Ok(None);
    };

    let subscriptions = queries::fetch_subscriptions(&mut *conn, id)
        .await
        .map_err(|e| db_error("Failed to load subscriptions", e))?;
    let books_read = queries::fetch_books_read(&mut *conn, id)
        .await
        .map_err(|e| db_error("Failed to load books read", e))?;

    member_from_rows(row, subscriptions, books_read).map(Some)
}

fn member_from_rows(
    row: MemberRow,
    subscriptions: Vec<SubscriptionRow>,
    books_read: Vec<Uuid>,
) -> Result<Member, DomainError> {
    let user_id = row
        .user_id
        .map(UserId::new)
        .transpose()
        .map_err(|e| corrupt(format!("Invalid user_id: {}", e)))?;

    let shipping_address = match (
        row.shipping_street,
        row.shipping_city,
        row.shipping_state,
        row.shipping_postal_code,
        row.shipping_country,
    ) {
        (Some(street), Some(city), state, postal_code, Some(country)) => Some(Address {
            street,
            city,
            state: state.unwrap_or_default(),
            postal_code: postal_code.unwrap_or_default(),
            country,
        }),
        _ => None,
    };

    let subscriptions = subscriptions
        .into_iter()
        .map(subscription_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Member {
        id: MemberId::from_uuid(row.id),
        user_id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        shipping_address,
        address: row.address,
        payment_customer_id: row.payment_customer_id,
        date_created: Timestamp::from_datetime(row.date_created),
        books_read: books_read.into_iter().map(BookId::from_uuid).collect(),
        subscriptions,
    })
}

fn subscription_from_row(row: SubscriptionRow) -> Result<Subscription, DomainError> {
    let dates = DateTimeRange::new(
        Timestamp::from_datetime(row.start_date),
        row.end_date.map(Timestamp::from_datetime),
    )
    .map_err(|e| corrupt(format!("Invalid dates for {}: {}", row.payment_subscription_id, e)))?;

    Ok(Subscription {
        id: SubscriptionId::from_uuid(row.id),
        member_id: MemberId::from_uuid(row.member_id),
        payment_subscription_id: row.payment_subscription_id,
        dates,
        last_invoice_id: row.last_invoice_id,
    })
}

fn corrupt(message: String) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, message)
}

/// Maps sqlx errors, recognising the unique constraints the schema declares.
pub(super) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("members_email_key") => {
                return DomainError::new(ErrorCode::MemberExists, "Email already registered")
            }
            Some("subscriptions_payment_subscription_id_key") => {
                return DomainError::new(
                    ErrorCode::SubscriptionExists,
                    "Payment subscription already recorded",
                )
            }
            _ => {}
        }
    }
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}
