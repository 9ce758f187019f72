use std::collections::BTreeSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::today;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ExerciseType, WorkoutRecord};
use crate::progress::{
    self, Bucket, DateRange, ExerciseProgressPoint, Period, RangeQuery, StreakSummary, Strike,
    Totals,
};
use crate::repositories::{ExerciseRepository, WorkoutRecordRepository};

#[derive(Clone)]
pub struct ProgressState {
    pub record_repo: WorkoutRecordRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub range: DateRange,
    pub totals: Totals,
    pub streaks: StreakSummary,
}

#[derive(Serialize)]
pub struct StrikesResponse {
    pub range: DateRange,
    pub strikes: Vec<Strike>,
    pub summary: StreakSummary,
}

#[derive(Debug, Deserialize)]
pub struct BucketQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub period: Period,
}

#[derive(Serialize)]
pub struct BucketsResponse {
    pub range: DateRange,
    pub period: Period,
    pub buckets: Vec<Bucket>,
}

#[derive(Serialize)]
pub struct ExerciseProgressResponse {
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub range: DateRange,
    pub points: Vec<ExerciseProgressPoint>,
}

async fn load(
    state: &ProgressState,
    auth_user: &AuthUser,
    range: &DateRange,
) -> Result<Vec<WorkoutRecord>> {
    state
        .record_repo
        .find_in_range(&auth_user.id, range.from, range.to)
        .await
}

fn workout_days(records: &[WorkoutRecord]) -> BTreeSet<NaiveDate> {
    records.iter().map(|r| r.date).collect()
}

pub async fn overview(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<OverviewResponse>> {
    let range = query.resolve(today())?;
    let records = load(&state, &auth_user, &range).await?;

    let strikes = progress::strikes(&range, &workout_days(&records));
    Ok(Json(OverviewResponse {
        range,
        totals: progress::totals(&records),
        streaks: progress::summarize_strikes(&range, &strikes),
    }))
}

pub async fn strikes(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<StrikesResponse>> {
    let range = query.resolve(today())?;
    let records = load(&state, &auth_user, &range).await?;

    let strikes = progress::strikes(&range, &workout_days(&records));
    let summary = progress::summarize_strikes(&range, &strikes);
    Ok(Json(StrikesResponse {
        range,
        strikes,
        summary,
    }))
}

pub async fn buckets(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Query(query): Query<BucketQuery>,
) -> Result<Json<BucketsResponse>> {
    let range = DateRange::resolve(query.from, query.to, today())?;
    let records = load(&state, &auth_user, &range).await?;

    Ok(Json(BucketsResponse {
        range,
        period: query.period,
        buckets: progress::buckets(&range, query.period, &records),
    }))
}

pub async fn exercise(
    State(state): State<ProgressState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ExerciseProgressResponse>> {
    let exercise = state
        .exercise_repo
        .find_by_id(&id)
        .await?
        .filter(|e| e.is_visible_to(&auth_user.id))
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let range = query.resolve(today())?;
    let records = load(&state, &auth_user, &range).await?;

    Ok(Json(ExerciseProgressResponse {
        points: progress::exercise_progress(&records, &exercise.id),
        exercise_id: exercise.id,
        exercise_name: exercise.name,
        exercise_type: exercise.exercise_type,
        range,
    }))
}
