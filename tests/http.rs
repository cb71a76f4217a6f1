use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct HabitResponse {
    id: String,
    name: String,
    paused: bool,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    total_habits: usize,
    active_habits: usize,
    paused_habits: usize,
    completed_today: usize,
    longest_simultaneous_streak: u32,
}

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct FitnessResponse {
    total_sessions: usize,
    total_minutes: f64,
    rest_days_last_30: u32,
    rest_day_pct: f64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "habit_app_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_app"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn stats(client: &Client, base_url: &str) -> StatsResponse {
    client
        .get(format!("{base_url}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_habit_lifecycle_updates_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = stats(&client, &server.base_url).await;

    let habit: HabitResponse = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&serde_json::json!({
            "name": "Morning run",
            "frequency": { "class": "daily" }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(habit.name, "Morning run");
    assert!(!habit.paused);

    let after_create = stats(&client, &server.base_url).await;
    assert_eq!(after_create.total_habits, before.total_habits + 1);
    assert_eq!(after_create.active_habits, before.active_habits + 1);

    let completed: HabitResponse = client
        .post(format!(
            "{}/api/habits/{}/complete",
            server.base_url, habit.id
        ))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(completed.id, habit.id);

    let after_complete = stats(&client, &server.base_url).await;
    assert_eq!(
        after_complete.completed_today,
        before.completed_today + 1
    );
    assert!(after_complete.longest_simultaneous_streak <= 366);

    let paused: HabitResponse = client
        .post(format!("{}/api/habits/{}/pause", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(paused.paused);

    let after_pause = stats(&client, &server.base_url).await;
    assert_eq!(after_pause.paused_habits, before.paused_habits + 1);
    assert_eq!(after_pause.total_habits, after_create.total_habits);
}

#[tokio::test]
async fn http_rejects_malformed_habits() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let blank = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&serde_json::json!({
            "name": "   ",
            "frequency": { "class": "daily" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);

    let bad_day = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&serde_json::json!({
            "name": "Stretch",
            "frequency": { "class": "weekly", "days": [9] }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_day.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_fitness_sessions_and_rest_days() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: FitnessResponse = client
        .get(format!("{}/api/fitness", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let activity: ActivityResponse = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&serde_json::json!({ "name": "Rowing" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(activity.name, "Rowing");

    let logged = client
        .post(format!(
            "{}/api/activities/{}/sessions",
            server.base_url, activity.id
        ))
        .json(&serde_json::json!({
            "duration": { "value": 30.0, "unit": "minutes" }
        }))
        .send()
        .await
        .unwrap();
    assert!(logged.status().is_success());

    let flagged = client
        .post(format!("{}/api/days", server.base_url))
        .json(&serde_json::json!({
            "date": "2026-01-05",
            "kind": "rest"
        }))
        .send()
        .await
        .unwrap();
    assert!(flagged.status().is_success());

    let after: FitnessResponse = client
        .get(format!("{}/api/fitness", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.total_sessions, before.total_sessions + 1);
    assert!((after.total_minutes - before.total_minutes - 30.0).abs() < 1e-9);
    assert!(after.rest_day_pct >= 0.0 && after.rest_day_pct <= 100.0);
    assert!(after.rest_days_last_30 <= 30);
}
