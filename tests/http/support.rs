//! Server fixtures: a seeded service behind a real listener.

use std::sync::Arc;

use user_records::http::{self, TokenVerifier};
use user_records::{FixedClock, InMemoryStore, User, UserService};

pub const TOKEN: &str = "123456";
pub const NOW: &str = "02/01/2006 15:04:05";

pub type TestService = UserService<InMemoryStore, FixedClock>;

fn user(
    id: u64,
    firstname: &str,
    lastname: &str,
    email: &str,
    age: i64,
    height: i64,
    active: bool,
    created_date: &str,
) -> User {
    User {
        id,
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        email: email.to_string(),
        age,
        height,
        active,
        created_date: created_date.to_string(),
        deleted_date: None,
    }
}

pub fn seed() -> Vec<User> {
    vec![
        user(1, "firstname", "lastname", "email", 24, 184, true, "22/02/2021"),
        user(2, "nombre", "apellido", "mail", 25, 185, false, "23/03/2021"),
        user(3, "firstname3", "lastname3", "email3", 26, 187, false, "25/02/2021"),
    ]
}

pub fn service() -> Arc<TestService> {
    Arc::new(UserService::new(
        InMemoryStore::with_users(seed()),
        FixedClock::parse(NOW).unwrap(),
    ))
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::from_tokens([TOKEN])
}

/// Bind to port 0 and return the base URL.
pub async fn start_server(service: Arc<TestService>) -> String {
    let app = http::router(service, verifier());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
