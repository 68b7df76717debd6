use crate::AppState;
use nas_domain::{GestureVocabulary, PrizeTable};

pub async fn get_prize_table(state: &AppState) -> PrizeTable {
    state.prize_table.read().await.clone()
}

pub async fn get_gesture_vocabulary(state: &AppState) -> GestureVocabulary {
    state.gestures.read().await.clone()
}
