//! Test utilities with lazy testcontainers support
//!
//! The PostgreSQL container is started lazily on first use and shared
//! across tests. Tests that need it are `#[ignore]`d so the default test
//! run stays Docker-free.

#[cfg(test)]
pub mod containers {
    use std::sync::OnceLock;
    use testcontainers::{runners::AsyncRunner, ContainerAsync};
    use testcontainers_modules::postgres::Postgres;

    static POSTGRES: OnceLock<ContainerAsync<Postgres>> = OnceLock::new();

    /// Get or start a PostgreSQL container (lazy initialization)
    pub async fn get_postgres() -> &'static ContainerAsync<Postgres> {
        if POSTGRES.get().is_none() {
            let container = Postgres::default()
                .with_user("mentormatch")
                .with_password("mentormatch_test")
                .with_db_name("mentormatch_test")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");

            let _ = POSTGRES.set(container);
        }
        POSTGRES.get().unwrap()
    }

    /// Get PostgreSQL connection URL from the container
    pub async fn postgres_url() -> String {
        let container = get_postgres().await;
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();
        format!(
            "postgres://mentormatch:mentormatch_test@{}:{}/mentormatch_test",
            host, port
        )
    }
}

#[cfg(test)]
pub mod test_app {
    use super::containers;
    use crate::config::Config;
    use crate::state::AppState;
    use sqlx::PgPool;

    /// Start a test server against a containerized database.
    ///
    /// Returns the server's base URL and the backing pool.
    pub async fn spawn_test_app() -> (String, PgPool) {
        let database_url = containers::postgres_url().await;

        let db_pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .expect("Failed to run migrations");

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url,
            jwt_secret: "test_secret_key_for_testing_only".to_string(),
            jwt_issuer: "mentormatch-api".to_string(),
            jwt_audience: "mentormatch-app".to_string(),
            jwt_expiration: 3600,
            environment: "test".to_string(),
        };

        let state = AppState::new(db_pool.clone(), config);
        let app = crate::create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), db_pool)
    }
}

#[cfg(test)]
mod tests {
    use super::test_app::spawn_test_app;
    use serde_json::{json, Value};

    fn client() -> reqwest::Client {
        // Never follow redirects: the image fallback redirect target is external
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    async fn signup(base: &str, email: &str, password: &str, name: &str, role: &str) -> u16 {
        client()
            .post(format!("{}/api/signup", base))
            .json(&json!({"email": email, "password": password, "name": name, "role": role}))
            .send()
            .await
            .unwrap()
            .status()
            .as_u16()
    }

    async fn login(base: &str, email: &str, password: &str) -> Option<String> {
        let resp = client()
            .post(format!("{}/api/login", base))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .unwrap();

        if !resp.status().is_success() {
            return None;
        }
        let body: Value = resp.json().await.unwrap();
        Some(body["token"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn signup_login_and_match_request_lifecycle() {
        let (base, _pool) = spawn_test_app().await;
        let http = client();

        // Signup succeeds once per email; the duplicate is rejected
        assert_eq!(signup(&base, "m@x.com", "pw123456", "Mentor A", "mentor").await, 201);
        assert_eq!(signup(&base, "m@x.com", "pw123456", "Mentor A", "mentor").await, 400);
        assert_eq!(signup(&base, "b@x.com", "pw123456", "Mentor B", "mentor").await, 201);
        assert_eq!(signup(&base, "e1@x.com", "pw123456", "Mentee One", "mentee").await, 201);
        assert_eq!(signup(&base, "e2@x.com", "pw123456", "Mentee Two", "mentee").await, 201);

        // Unrecognized role is invalid input
        assert_eq!(signup(&base, "z@x.com", "pw123456", "Nope", "admin").await, 400);

        // Login succeeds iff the password verifies
        assert!(login(&base, "m@x.com", "wrong-password").await.is_none());
        let mentor_token = login(&base, "m@x.com", "pw123456").await.unwrap();
        let mentee1_token = login(&base, "e1@x.com", "pw123456").await.unwrap();
        let mentee2_token = login(&base, "e2@x.com", "pw123456").await.unwrap();

        // Mentee discovers mentors; mentors may not
        let mentors: Value = http
            .get(format!("{}/api/mentors", base))
            .bearer_auth(&mentee1_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let mentor_a = mentors
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["email"] == "m@x.com")
            .unwrap();
        let mentor_a_id = mentor_a["id"].as_i64().unwrap();
        let mentor_b_id = mentors
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["email"] == "b@x.com")
            .unwrap()["id"]
            .as_i64()
            .unwrap();

        let forbidden = http
            .get(format!("{}/api/mentors", base))
            .bearer_auth(&mentor_token)
            .send()
            .await
            .unwrap();
        assert_eq!(forbidden.status().as_u16(), 403);

        let me: Value = http
            .get(format!("{}/api/me", base))
            .bearer_auth(&mentee1_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let mentee1_id = me["id"].as_i64().unwrap();

        // Mentee one requests mentor A
        let created = http
            .post(format!("{}/api/match-requests", base))
            .bearer_auth(&mentee1_token)
            .json(&json!({"mentorId": mentor_a_id, "menteeId": mentee1_id, "message": "hi"}))
            .send()
            .await
            .unwrap();
        assert!(created.status().is_success());
        let created: Value = created.json().await.unwrap();
        assert_eq!(created["status"], "pending");
        let request_id = created["id"].as_i64().unwrap();

        // A second outstanding request, even to a different mentor, conflicts
        let second = http
            .post(format!("{}/api/match-requests", base))
            .bearer_auth(&mentee1_token)
            .json(&json!({"mentorId": mentor_b_id, "menteeId": mentee1_id, "message": ""}))
            .send()
            .await
            .unwrap();
        assert_eq!(second.status().as_u16(), 400);

        // Mentee two also requests mentor A
        let me2: Value = http
            .get(format!("{}/api/me", base))
            .bearer_auth(&mentee2_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let mentee2_id = me2["id"].as_i64().unwrap();
        let created2: Value = http
            .post(format!("{}/api/match-requests", base))
            .bearer_auth(&mentee2_token)
            .json(&json!({"mentorId": mentor_a_id, "menteeId": mentee2_id, "message": "me too"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let request2_id = created2["id"].as_i64().unwrap();

        // The incoming view carries messages; the outgoing view omits them
        let incoming: Value = http
            .get(format!("{}/api/match-requests/incoming", base))
            .bearer_auth(&mentor_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(incoming.as_array().unwrap().len(), 2);
        assert!(incoming[0].get("message").is_some());

        let outgoing: Value = http
            .get(format!("{}/api/match-requests/outgoing", base))
            .bearer_auth(&mentee1_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(outgoing[0].get("message").is_none());

        // Mentor accepts the first request; a second accept conflicts
        let accepted: Value = http
            .put(format!("{}/api/match-requests/{}/accept", base, request_id))
            .bearer_auth(&mentor_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(accepted["status"], "accepted");

        let double_accept = http
            .put(format!("{}/api/match-requests/{}/accept", base, request2_id))
            .bearer_auth(&mentor_token)
            .send()
            .await
            .unwrap();
        assert_eq!(double_accept.status().as_u16(), 400);

        // Accepting someone else's request is indistinguishable from a miss
        let foreign_accept = http
            .put(format!("{}/api/match-requests/{}/accept", base, request_id))
            .bearer_auth(&login(&base, "b@x.com", "pw123456").await.unwrap())
            .send()
            .await
            .unwrap();
        assert_eq!(foreign_accept.status().as_u16(), 404);

        // The mentee can cancel even an accepted request
        let cancelled: Value = http
            .delete(format!("{}/api/match-requests/{}", base, request_id))
            .bearer_auth(&mentee1_token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(cancelled["status"], "cancelled");
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn mentor_listing_filters_and_sorts() {
        let (base, _pool) = spawn_test_app().await;
        let http = client();

        assert_eq!(signup(&base, "aa@skills.com", "pw123456", "Aardvark Mentor", "mentor").await, 201);
        assert_eq!(signup(&base, "zz@skills.com", "pw123456", "Zebra Mentor", "mentor").await, 201);
        assert_eq!(signup(&base, "seek@skills.com", "pw123456", "Seeker", "mentee").await, 201);

        for (email, skills) in [
            ("aa@skills.com", json!(["Rust", "Distributed Systems"])),
            ("zz@skills.com", json!(["snake_case", "Go"])),
        ] {
            let token = login(&base, email, "pw123456").await.unwrap();
            let me: Value = http
                .get(format!("{}/api/me", base))
                .bearer_auth(&token)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            let updated = http
                .put(format!("{}/api/profile", base))
                .bearer_auth(&token)
                .json(&json!({
                    "id": me["id"],
                    "name": me["profile"]["name"],
                    "role": "mentor",
                    "bio": "",
                    "skills": skills,
                }))
                .send()
                .await
                .unwrap();
            assert!(updated.status().is_success());
        }

        let mentee_token = login(&base, "seek@skills.com", "pw123456").await.unwrap();
        let list = |query: &str| {
            let http = http.clone();
            let url = format!("{}/api/mentors{}", base, query);
            let token = mentee_token.clone();
            async move {
                let listed: Value = http
                    .get(url)
                    .bearer_auth(&token)
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                listed
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|m| m["email"].as_str().unwrap().to_string())
                    .collect::<Vec<_>>()
            }
        };

        // The filter is a case-insensitive substring match on the skill list
        let rustaceans = list("?skill=rust").await;
        assert!(rustaceans.contains(&"aa@skills.com".to_string()));
        assert!(!rustaceans.contains(&"zz@skills.com".to_string()));

        // LIKE metacharacters in the filter match literally
        let underscored = list("?skill=_").await;
        assert!(underscored.contains(&"zz@skills.com".to_string()));
        assert!(!underscored.contains(&"aa@skills.com".to_string()));

        // Sorting by name is ascending
        let by_name = list("?order_by=name").await;
        let aardvark = by_name.iter().position(|e| e == "aa@skills.com").unwrap();
        let zebra = by_name.iter().position(|e| e == "zz@skills.com").unwrap();
        assert!(aardvark < zebra);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn missing_profile_image_redirects_to_placeholder() {
        let (base, _pool) = spawn_test_app().await;
        let http = client();

        assert_eq!(signup(&base, "img@x.com", "pw123456", "Pic Less", "mentor").await, 201);
        let token = login(&base, "img@x.com", "pw123456").await.unwrap();
        let me: Value = http
            .get(format!("{}/api/me", base))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = me["id"].as_i64().unwrap();

        let resp = http
            .get(format!("{}/images/mentor/{}", base, id))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_redirection());
        let location = resp.headers()["location"].to_str().unwrap();
        assert!(location.contains("MENTOR"));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn protected_routes_require_a_valid_token() {
        let (base, _pool) = spawn_test_app().await;
        let http = client();

        let no_token = http
            .get(format!("{}/api/me", base))
            .send()
            .await
            .unwrap();
        assert_eq!(no_token.status().as_u16(), 401);

        let bad_token = http
            .get(format!("{}/api/me", base))
            .bearer_auth("not-a-jwt")
            .send()
            .await
            .unwrap();
        assert_eq!(bad_token.status().as_u16(), 401);
    }
}
