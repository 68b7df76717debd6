use tracing::info;

use crate::{AppError, AppState};
use nas_domain::{GestureVocabulary, PrizeTable};

pub async fn update_prize_table(state: &AppState, incoming: PrizeTable) -> Result<(), AppError> {
    let table = incoming.normalized();
    table
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    state
        .config_repo
        .save_prize_table(&state.config.prizes_path, &table)
        .await
        .map_err(AppError::Internal)?;
    info!(
        prizes = table.entries.len(),
        residual = table.residual_probability(),
        "prize table updated"
    );
    *state.prize_table.write().await = table;
    Ok(())
}

pub async fn update_gesture_vocabulary(
    state: &AppState,
    incoming: GestureVocabulary,
) -> Result<(), AppError> {
    let vocabulary = incoming.normalized();
    vocabulary
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    state
        .config_repo
        .save_gesture_vocabulary(&state.config.stamps_path, &vocabulary)
        .await
        .map_err(AppError::Internal)?;
    info!(
        default = %vocabulary.default,
        stamps = vocabulary.stamps.len(),
        "gesture vocabulary updated"
    );
    *state.gestures.write().await = vocabulary;
    Ok(())
}
