use dcgall::{Endpoints, Session};
use wiremock::MockServer;

/// Guest session wired to a mock server's endpoint table.
pub fn guest_session(server: &MockServer) -> Session {
    Session::builder()
        .guest("nick", "pw")
        .endpoints(Endpoints::on_host(&server.uri()))
        .build()
        .expect("session must build")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
