use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    dto::notifications::{MarkReadRequest, NotificationList},
    entity::notifications::{
        ActiveModel as NotificationActive, Column as NotificationCol, Entity as Notifications,
        Model as NotificationModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Persist one in-app notification. Delivery to devices is handled elsewhere.
pub async fn push_notification<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    title: &str,
    body: &str,
) -> AppResult<()> {
    NotificationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        is_read: Set(false),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Fan a notification out to many users in one insert.
pub async fn push_notifications_bulk(
    orm: &OrmConn,
    user_ids: &[Uuid],
    title: &str,
    body: &str,
) -> AppResult<()> {
    if user_ids.is_empty() {
        return Ok(());
    }

    let records = user_ids.iter().map(|user_id| NotificationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(*user_id),
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        is_read: Set(false),
        created_at: NotSet,
    });
    Notifications::insert_many(records).exec(orm).await?;
    Ok(())
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let items = Notifications::find()
        .filter(NotificationCol::UserId.eq(user.user_id))
        .order_by_desc(NotificationCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(notification_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        NotificationList { items },
        Some(Meta::empty()),
    ))
}

pub async fn mark_notification_read(
    state: &AppState,
    user: &AuthUser,
    payload: MarkReadRequest,
) -> AppResult<ApiResponse<Notification>> {
    let notification = Notifications::find()
        .filter(NotificationCol::Id.eq(payload.id))
        .filter(NotificationCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: NotificationActive = notification.into();
    active.is_read = Set(true);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Ok",
        notification_from_entity(updated),
        None,
    ))
}

fn notification_from_entity(model: NotificationModel) -> Notification {
    Notification {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        body: model.body,
        is_read: model.is_read,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
