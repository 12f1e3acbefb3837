//! REST API endpoint handlers for the sync service.
//!
//! Reads take the shared lock on [`AppState`]; mutations go through
//! [`AppState::mutate`], which also flushes the durable snapshot.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/`, `/admin` | Minimal HTML status page |
//! | `GET` | `/api/lots` | Aggregated snapshot of every lot |
//! | `GET` | `/api/lot/{id}` | One lot, bitmap included |
//! | `POST` | `/api/lot/{id}/toggle/{index}` | Flip one space |
//! | `POST` | `/api/lot/{id}/reset` | Empty every space |
//! | `POST` | `/api/lot/{id}/fill` | Occupy every space |
//! | `POST` | `/api/lot/{id}/random` | Realistic random occupancy |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use lotwatch_core::classify;
use lotwatch_types::{BulkOutcome, LotId, RandomizeOutcome, ToggleOutcome};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing every lot with its counts, status, and
/// buttons for the bulk operations.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.read().await;

    let rows: String = store
        .lots()
        .iter()
        .map(|lot| {
            let def = lot.definition();
            let status = classify(lot.occupied(), def.capacity());
            format!(
                r#"        <tr>
            <td>{name}</td>
            <td>{permit}</td>
            <td>{occupied} / {capacity}</td>
            <td>{available}</td>
            <td style="color:{color}">{status}</td>
            <td>
                <button onclick="act('{id}','reset')">Reset</button>
                <button onclick="act('{id}','fill')">Fill</button>
                <button onclick="act('{id}','random')">Random</button>
            </td>
        </tr>
"#,
                id = def.id(),
                name = def.name(),
                permit = def.permit(),
                occupied = lot.occupied(),
                capacity = def.capacity(),
                available = lot.available(),
                color = status.color_hint(),
            )
        })
        .collect();
    drop(store);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Lotwatch Admin</title>
    <style>
        body {{ font-family: sans-serif; padding: 2rem; max-width: 900px; margin: 0 auto; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid #ddd; padding: 0.5rem; text-align: left; }}
        code {{ background: #f4f4f4; padding: 0 0.25rem; }}
    </style>
    <script>
        async function act(id, op) {{
            await fetch(`/api/lot/${{id}}/${{op}}`, {{ method: 'POST' }});
            location.reload();
        }}
    </script>
</head>
<body>
    <h1>Lotwatch Admin</h1>
    <p>Simulated sensor control for the parking sync service.</p>
    <table>
        <tr><th>Lot</th><th>Permit</th><th>Occupied</th><th>Free</th><th>Status</th><th></th></tr>
{rows}    </table>
    <h2>API</h2>
    <ul>
        <li><code>GET /api/lots</code></li>
        <li><code>GET /api/lot/{{id}}</code></li>
        <li><code>POST /api/lot/{{id}}/toggle/{{index}}</code></li>
        <li><code>POST /api/lot/{{id}}/reset</code>, <code>/fill</code>, <code>/random</code></li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/lots -- aggregated snapshot of every lot
// ---------------------------------------------------------------------------

/// Return the aggregated snapshot of every lot, in catalog order.
pub async fn list_lots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.read().await;
    Json(store.summaries(Utc::now()))
}

// ---------------------------------------------------------------------------
// GET /api/lot/{id} -- one lot with its bitmap
// ---------------------------------------------------------------------------

/// Return one lot's aggregated snapshot including the per-space bitmap.
pub async fn get_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.read().await;
    let detail = store.detail(&LotId::from(id), Utc::now())?;
    Ok(Json(detail))
}

// ---------------------------------------------------------------------------
// POST /api/lot/{id}/toggle/{index}
// ---------------------------------------------------------------------------

/// Flip one space between empty and occupied.
///
/// An unknown lot is reported as 404 before the index is looked at.
pub async fn toggle_space(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let lot_id = LotId::from(id);
    state.read().await.lot(&lot_id)?;
    let index = parse_index(&index)?;

    let result = state
        .mutate(|store| {
            let occupied = store.toggle(&lot_id, index)?;
            let lot = store.lot(&lot_id)?;
            Ok((occupied, lot.occupied(), lot.available()))
        })
        .await?;
    let (occupied, occupied_count, available_count) = result.value;

    info!(lot_id = %lot_id, index, occupied, occupied_count, "space toggled");

    Ok(Json(ToggleOutcome {
        success: true,
        lot_id,
        space_index: index,
        occupied,
        occupied_count,
        available_count,
        persisted: result.persisted(),
        warning: result.warning(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/lot/{id}/reset and /fill
// ---------------------------------------------------------------------------

/// Mark every space of a lot empty.
pub async fn reset_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lot_id = LotId::from(id);
    let result = state.mutate(|store| store.reset(&lot_id)).await?;

    info!(lot_id = %lot_id, "lot reset");

    Ok(Json(BulkOutcome {
        success: true,
        lot_id,
        message: String::from("All spaces cleared"),
        persisted: result.persisted(),
        warning: result.warning(),
    }))
}

/// Mark every space of a lot occupied.
pub async fn fill_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lot_id = LotId::from(id);
    let result = state.mutate(|store| store.fill(&lot_id)).await?;

    info!(lot_id = %lot_id, "lot filled");

    Ok(Json(BulkOutcome {
        success: true,
        lot_id,
        message: String::from("All spaces filled"),
        persisted: result.persisted(),
        warning: result.warning(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/lot/{id}/random
// ---------------------------------------------------------------------------

/// Replace a lot's occupancy with a random pattern whose count is drawn from
/// the lot's busy range.
pub async fn randomize_lot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lot_id = LotId::from(id);
    let result = state
        .mutate(|store| {
            let occupied = store.randomize_realistic(&lot_id, &mut rand::rng())?;
            let lot = store.lot(&lot_id)?;
            Ok((occupied, lot.available()))
        })
        .await?;
    let (occupied_count, available_count) = result.value;

    info!(lot_id = %lot_id, occupied_count, "lot randomized");

    Ok(Json(RandomizeOutcome {
        success: true,
        lot_id,
        occupied_count,
        available_count,
        persisted: result.persisted(),
        warning: result.warning(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a space index from the request path.
fn parse_index(s: &str) -> Result<usize, ApiError> {
    s.parse::<usize>()
        .map_err(|e| ApiError::OutOfRange(format!("Invalid space index: {s}: {e}")))
}
