// Game sessions: one engine per connection, driven by its own task

mod registry;

pub use registry::{SessionRegistry, SessionSummary};

use crate::config::TrailConfig;
use crate::game::{Color, GameEngine, SubmitOutcome};
use crate::presentation::Presenter;
use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};
use uuid::Uuid;


/// Control operations accepted by a session
#[derive(Debug)]
pub enum Command {
    Start,
    Submit(Color),
    Pause,
    Resume,
    Quit,
    Menu,
    /// Reply with the session's current summary
    Summary(oneshot::Sender<SessionSummary>),
}

/// Cheap, cloneable handle to a running session.
///
/// The session task ends once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| anyhow!("session {} has ended", self.id))
    }

    pub fn start(&self) -> Result<()> {
        self.send(Command::Start)
    }

    pub fn submit_color(&self, color: Color) -> Result<()> {
        self.send(Command::Submit(color))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(Command::Resume)
    }

    pub fn quit(&self) -> Result<()> {
        self.send(Command::Quit)
    }

    pub fn menu(&self) -> Result<()> {
        self.send(Command::Menu)
    }

    /// Current summary, answered in order with earlier commands
    pub async fn summary(&self) -> Result<SessionSummary> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Summary(reply_tx))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("session {} has ended", self.id))
    }
}

/// Spawns the task that owns a session's engine
pub struct GameSession;

impl GameSession {
    pub fn spawn<P>(
        config: &TrailConfig,
        presenter: P,
        registry: Arc<SessionRegistry>,
    ) -> (SessionHandle, JoinHandle<()>)
    where
        P: Presenter + Send + 'static,
    {
        Self::spawn_with_rng(config, presenter, registry, StdRng::from_entropy())
    }

    pub fn spawn_with_rng<P, R>(
        config: &TrailConfig,
        presenter: P,
        registry: Arc<SessionRegistry>,
        rng: R,
    ) -> (SessionHandle, JoinHandle<()>)
    where
        P: Presenter + Send + 'static,
        R: Rng + Send + 'static,
    {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = GameEngine::with_rng(config, presenter, rng);
        registry.register(id, engine.state());

        let task = tokio::spawn(run_session(id, engine, rx, registry));
        (SessionHandle { id, tx }, task)
    }
}

/// Session loop: one command or one due transition at a time, each run to
/// completion before the next.
async fn run_session<P, R>(
    id: Uuid,
    mut engine: GameEngine<P, R>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    registry: Arc<SessionRegistry>,
) where
    P: Presenter,
    R: Rng,
{
    info!(session_id = %id, "Session started");

    loop {
        let deadline = engine.next_deadline();

        tokio::select! {
            command = rx.recv() => {
                match command {
                    Some(command) => apply(&mut engine, &registry, id, command),
                    None => break,
                }
            }
            _ = wait_for(deadline) => {
                let now = Instant::now();
                while engine.fire_due(now) {}
            }
        }

        registry.record(id, engine.state());
    }

    registry.remove(&id);
    info!(session_id = %id, "Session ended");
}

fn apply<P, R>(engine: &mut GameEngine<P, R>, registry: &SessionRegistry, id: Uuid, command: Command)
where
    P: Presenter,
    R: Rng,
{
    let now = Instant::now();
    match command {
        Command::Start => engine.start(now),
        Command::Submit(color) => {
            let outcome = engine.submit_color(color, now);
            if outcome == SubmitOutcome::Ignored {
                debug!(session_id = %id, color = %color, "Input ignored");
            }
        }
        Command::Pause => {
            if !engine.pause(now) {
                debug!(session_id = %id, "Pause ignored");
            }
        }
        Command::Resume => {
            if !engine.resume(now) {
                debug!(session_id = %id, "Resume ignored");
            }
        }
        Command::Quit => engine.quit(),
        Command::Menu => engine.menu(),
        Command::Summary(reply) => {
            registry.record(id, engine.state());
            let summary = registry
                .get(&id)
                .unwrap_or_else(|| SessionSummary::new(id, engine.state()));
            let _ = reply.send(summary);
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
