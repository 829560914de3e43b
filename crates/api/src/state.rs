use huddle_config::Settings;
use huddle_services::{
    AuthService, DashboardService, FeedHub, GoogleDriveService, PresenceRegistry,
    auth::AuthError,
    dao::{announcement::AnnouncementDao, chat_message::ChatMessageDao, member::MemberDao},
    presence::MongoPresenceStore,
};
use mongodb::Database;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub members: Arc<MemberDao>,
    pub chat: Arc<ChatMessageDao>,
    pub announcements: Arc<AnnouncementDao>,
    pub drive: Arc<GoogleDriveService>,
    pub feeds: Arc<FeedHub>,
    pub registry: Arc<PresenceRegistry>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Result<Self, AuthError> {
        let auth = Arc::new(AuthService::new(settings.identity.clone())?);
        let members = Arc::new(MemberDao::new(&db));
        let chat = Arc::new(ChatMessageDao::new(&db));
        let announcements = Arc::new(AnnouncementDao::new(&db));
        let drive = Arc::new(GoogleDriveService::new(&settings.drive));
        let feeds = Arc::new(FeedHub::default());

        let store = Arc::new(MongoPresenceStore::new(members.clone(), feeds.clone()));
        let registry = Arc::new(PresenceRegistry::new(
            store,
            Duration::from_secs(settings.presence.offline_grace_secs),
        ));
        let dashboard = Arc::new(DashboardService::new(
            members.clone(),
            chat.clone(),
            announcements.clone(),
            settings.links.clone(),
        ));

        Ok(Self {
            db,
            settings,
            auth,
            members,
            chat,
            announcements,
            drive,
            feeds,
            registry,
            dashboard,
        })
    }
}
