use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument, warn};

use super::loader::index_by;
use super::{ScoringStore, ScoringTransaction};
use crate::game::models::{GameDetails, GameModel, TeamModel, WeekModel};
use crate::league::models::{LeagueModel, UserModel};
use crate::pick::models::PickModel;
use crate::shared::AppError;

/// Tables held by the in-memory store. Ordered maps keep iteration
/// deterministic for callers that list rows.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) users: BTreeMap<i64, UserModel>,
    pub(crate) leagues: BTreeMap<i64, LeagueModel>,
    pub(crate) league_members: BTreeSet<(i64, i64)>, // (league_id, user_id)
    pub(crate) weeks: BTreeMap<i64, WeekModel>,
    pub(crate) teams: BTreeMap<i64, TeamModel>,
    pub(crate) games: BTreeMap<i64, GameModel>,
    pub(crate) picks: BTreeMap<i64, PickModel>,
    next_pick_id: i64,
}

impl StoreState {
    pub(crate) fn allocate_pick_id(&mut self) -> i64 {
        self.next_pick_id += 1;
        self.next_pick_id
    }

    /// Season a game belongs to, reached through its week
    pub(crate) fn season_of_game(&self, game_id: i64) -> Option<i64> {
        let game = self.games.get(&game_id)?;
        self.weeks.get(&game.week_id).map(|week| week.season_id)
    }

    /// Resolves a game's week and teams; a dangling reference is a storage fault
    pub(crate) fn game_details(&self, game: GameModel) -> Result<GameDetails, AppError> {
        let week = self.weeks.get(&game.week_id).cloned().ok_or_else(|| {
            warn!(game_id = game.id, week_id = game.week_id, "Game references missing week");
            AppError::DatabaseError(format!("Week {} not found", game.week_id))
        })?;

        let teams = index_by(
            GameDetails::team_ids(&game)
                .into_iter()
                .filter_map(|id| self.teams.get(&id).cloned()),
            |team| team.id,
        );

        GameDetails::assemble(game, week, &teams)
    }
}

/// In-memory implementation of every repository for development and testing
///
/// Data is lost when the application restarts. A transaction holds the store
/// exclusively until it commits or rolls back, so readers observe either the
/// state before a finalize or the state after it, never a mix.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().await
    }

    pub async fn insert_user(&self, user: UserModel) {
        self.write().await.users.insert(user.id, user);
    }

    pub async fn insert_league(&self, league: LeagueModel) {
        self.write().await.leagues.insert(league.id, league);
    }

    pub async fn add_league_member(&self, league_id: i64, user_id: i64) {
        self.write()
            .await
            .league_members
            .insert((league_id, user_id));
    }

    pub async fn insert_week(&self, week: WeekModel) {
        self.write().await.weeks.insert(week.id, week);
    }

    pub async fn insert_team(&self, team: TeamModel) {
        self.write().await.teams.insert(team.id, team);
    }

    pub async fn insert_game(&self, game: GameModel) {
        self.write().await.games.insert(game.id, game);
    }

    /// Stores a pick as given, keeping later generated ids above it
    pub async fn insert_pick(&self, pick: PickModel) {
        let mut state = self.write().await;
        state.next_pick_id = state.next_pick_id.max(pick.id);
        state.picks.insert(pick.id, pick);
    }
}

#[async_trait]
impl ScoringStore for InMemoryStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn ScoringTransaction>, AppError> {
        let guard = self.state.clone().write_owned().await;
        debug!("Opened in-memory transaction");
        Ok(Box::new(InMemoryTransaction::new(guard)))
    }
}

/// Exclusive unit of work over the in-memory store
///
/// Writes are staged and only applied to the shared tables on commit.
pub struct InMemoryTransaction {
    state: OwnedRwLockWriteGuard<StoreState>,
    staged_games: HashMap<i64, GameModel>,
    staged_picks: BTreeMap<i64, PickModel>,
}

impl InMemoryTransaction {
    fn new(state: OwnedRwLockWriteGuard<StoreState>) -> Self {
        Self {
            state,
            staged_games: HashMap::new(),
            staged_picks: BTreeMap::new(),
        }
    }
}

#[async_trait]
impl ScoringTransaction for InMemoryTransaction {
    async fn game_for_update(&mut self, game_id: i64) -> Result<Option<GameModel>, AppError> {
        let game = self
            .staged_games
            .get(&game_id)
            .or_else(|| self.state.games.get(&game_id))
            .cloned();
        Ok(game)
    }

    async fn update_game_result(&mut self, game: &GameModel) -> Result<(), AppError> {
        if !self.state.games.contains_key(&game.id) {
            warn!(game_id = game.id, "Game not found for update in memory");
            return Err(AppError::NotFound(format!("Game {} not found", game.id)));
        }
        self.staged_games.insert(game.id, game.clone());
        Ok(())
    }

    async fn picks_for_game(&mut self, game_id: i64) -> Result<Vec<PickModel>, AppError> {
        let picks = self
            .state
            .picks
            .values()
            .filter(|pick| pick.game_id == game_id)
            .map(|pick| self.staged_picks.get(&pick.id).unwrap_or(pick).clone())
            .collect();
        Ok(picks)
    }

    async fn update_pick_score(&mut self, pick: &PickModel) -> Result<(), AppError> {
        if !self.state.picks.contains_key(&pick.id) {
            warn!(pick_id = pick.id, "Pick not found for update in memory");
            return Err(AppError::NotFound(format!("Pick {} not found", pick.id)));
        }
        self.staged_picks.insert(pick.id, pick.clone());
        Ok(())
    }

    async fn game_details(&mut self, game_id: i64) -> Result<Option<GameDetails>, AppError> {
        let Some(game) = self.game_for_update(game_id).await? else {
            return Ok(None);
        };
        self.state.game_details(game).map(Some)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let InMemoryTransaction {
            mut state,
            staged_games,
            staged_picks,
        } = *self;

        let (games, picks) = (staged_games.len(), staged_picks.len());
        state.games.extend(staged_games);
        state.picks.extend(staged_picks);

        debug!(games, picks, "Committed in-memory transaction");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        debug!(
            discarded_games = self.staged_games.len(),
            discarded_picks = self.staged_picks.len(),
            "Rolled back in-memory transaction"
        );
        Ok(())
    }
}
