use crate::service::MatchService;

#[derive(Clone)]
pub struct AppState {
    pub match_service: MatchService,
}
