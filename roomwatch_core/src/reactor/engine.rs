use super::event::{Command, Delivery, ReactorHandle, TimerEvent};
use super::light_timer::LightTimer;
use crate::config::MonitorConfig;
use crate::domain::{
    classify, format_bare, format_value, AlarmStatus, AlertKind, AlertState, HistoryEntry,
    LightPhase, LightTransition, SensorKind, SensorReading, SensorValue, TemperatureHistory, ACK,
};
use crate::error::{DisplayError, RoomwatchError, RoomwatchResult};
use crate::ports::{
    child_path, AlarmSound, DisplaySurface, Emphasis, NotificationSurface, Permission, Region,
    SchemaAdapter, Session,
};
use chrono::Local;
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Banner shown when the light has been on for the reminder delay
pub const LIGHT_REMINDER_TEXT: &str = "Light is ON for a while — consider switching off";

/// Body of the system notification sent with the reminder
pub const LIGHT_REMINDER_BODY: &str = "Light ON detected";

/// Sensor display and alarm reactor
///
/// Turns store deliveries into display text, alarm emphasis and sound, the
/// light-on timer and the temperature log. All state is owned here and only
/// touched from the reactor loop, so deliveries from different streams may
/// arrive in any order.
pub struct Reactor<S, D, N, A> {
    config: MonitorConfig,
    schema: S,
    display: D,
    notifier: N,
    sound: A,

    light_timer: LightTimer,
    history: TemperatureHistory,
    alarm: Option<AlarmStatus>,

    banner_generation: u64,
    banner_hide: Option<JoinHandle<()>>,
    reported_missing: HashSet<Region>,

    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: Option<mpsc::UnboundedReceiver<TimerEvent>>,
    command_tx: mpsc::UnboundedSender<Command>,
    command_rx: Option<mpsc::UnboundedReceiver<Command>>,
}

impl<S, D, N, A> Reactor<S, D, N, A>
where
    S: SchemaAdapter + 'static,
    D: DisplaySurface + 'static,
    N: NotificationSurface + 'static,
    A: AlarmSound + 'static,
{
    pub fn new(config: MonitorConfig, schema: S, display: D, notifier: N, sound: A) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        Self {
            light_timer: LightTimer::new(config.light_timer.clone(), timer_tx.clone()),
            history: TemperatureHistory::new(config.history_capacity),
            alarm: None,
            banner_generation: 0,
            banner_hide: None,
            reported_missing: HashSet::new(),
            config,
            schema,
            display,
            notifier,
            sound,
            timer_tx,
            timer_rx: Some(timer_rx),
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Handle for acknowledging alarms or stopping the loop
    pub fn handle(&self) -> ReactorHandle {
        ReactorHandle::new(self.command_tx.clone())
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    pub fn light_phase(&self) -> LightPhase {
        self.light_timer.phase()
    }

    /// Most recent alarm classification
    pub fn alarm(&self) -> Option<&AlarmStatus> {
        self.alarm.as_ref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Subscribe and process events until shutdown or session loss
    ///
    /// Refuses to subscribe at all when `session` holds no session.
    pub async fn run(mut self, mut session: watch::Receiver<Option<Session>>) -> RoomwatchResult<()> {
        if session.borrow().is_none() {
            return Err(RoomwatchError::Unauthenticated);
        }
        let mut timers = self.timer_rx.take().ok_or(RoomwatchError::ReactorStopped)?;
        let mut commands = self.command_rx.take().ok_or(RoomwatchError::ReactorStopped)?;

        let paths = self.config.paths.clone();
        let mut temperature = self.schema.subscribe_latest(&paths.temperature)?;
        let mut humidity = self.schema.subscribe_latest(&paths.humidity)?;
        let mut light = self.schema.subscribe_latest(&paths.light)?;
        let mut alerts = self.schema.subscribe_latest(&paths.alerts)?;
        let mut samples = self
            .schema
            .subscribe_history(&paths.temperature, self.config.history_capacity)?;

        self.start();
        info!(
            "Dashboard reactor started ({} layout, alerts at {})",
            self.schema.layout(),
            paths.alerts
        );

        loop {
            // Store deliveries win over timer events that became ready at
            // the same instant, so a light-off always beats a due tick.
            tokio::select! {
                biased;

                Some(value) = temperature.recv() => self.deliver(Delivery::Temperature(value)),
                Some(value) = humidity.recv() => self.deliver(Delivery::Humidity(value)),
                Some(value) = light.recv() => self.deliver(Delivery::Light(value)),
                Some(value) = alerts.recv() => self.deliver(Delivery::Alerts(value)),
                Some(batch) = samples.recv() => self.deliver(Delivery::TemperatureSamples(batch)),
                command = commands.recv() => match command {
                    Some(Command::Acknowledge(kind)) => self.acknowledge(kind),
                    Some(Command::Shutdown) | None => {
                        info!("Dashboard reactor shutting down");
                        break;
                    }
                },
                changed = session.changed() => {
                    if changed.is_err() || session.borrow().is_none() {
                        warn!("Session ended, leaving dashboard");
                        break;
                    }
                }
                Some(event) = timers.recv() => self.handle_timer(event),
                else => break,
            }
        }

        self.stop();
        Ok(())
    }

    /// Process one store delivery
    pub fn deliver(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Temperature(value) => self.on_sensor(SensorKind::Temperature, &value),
            Delivery::Humidity(value) => self.on_sensor(SensorKind::Humidity, &value),
            Delivery::Light(value) => self.on_sensor(SensorKind::Light, &value),
            Delivery::Alerts(value) => self.on_alerts(&value),
            Delivery::TemperatureSamples(batch) => self.on_samples(batch),
        }
    }

    /// Process one timer firing
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::LightTick { epoch } => {
                if let Some(secs) = self.light_timer.elapsed_for(epoch) {
                    self.show_elapsed(secs);
                }
            }
            TimerEvent::Reminder { epoch } => {
                if self.light_timer.should_remind(epoch) {
                    self.remind();
                }
            }
            TimerEvent::BannerExpired { generation } => {
                if generation == self.banner_generation {
                    let result = self.display.hide_banner();
                    self.paint(Region::Banner, result);
                }
            }
        }
    }

    /// Write `ACK` to the alert field and confirm with a banner
    ///
    /// The write is fire-and-forget; a failure is logged and the banner is
    /// shown regardless.
    pub fn acknowledge(&mut self, kind: AlertKind) {
        let field = match kind {
            AlertKind::Temperature => &self.config.alert_fields.temperature,
            AlertKind::Light => &self.config.alert_fields.light,
        };
        let path = child_path(&self.config.paths.alerts, field);
        info!("Acknowledging {} alarm at {}", kind, path);

        if let Err(e) = self.schema.write(&path, Value::from(ACK)) {
            warn!("Failed to acknowledge {} alarm: {}", kind, e);
        }
        self.show_transient(kind.acknowledged_message());
    }

    fn start(&mut self) {
        if self.notifier.permission() != Permission::Granted {
            let permission = self.notifier.request_permission();
            debug!("Notification permission: {}", permission);
        }
        let lines = self.history.render_lines();
        let result = self.display.render_log(&lines);
        self.paint(Region::Log, result);
    }

    fn stop(&mut self) {
        self.light_timer.shutdown();
        if let Some(hide) = self.banner_hide.take() {
            hide.abort();
        }
    }

    fn on_sensor(&mut self, kind: SensorKind, raw: &Value) {
        let reading = SensorReading::new(kind, SensorValue::from_json(raw));
        debug!("{} data received: {}", kind, raw);

        let (region, text) = match kind {
            SensorKind::Temperature => (
                Region::Temperature,
                format!("Temp: {}", format_value(&reading.value, kind.unit())),
            ),
            SensorKind::Humidity => (
                Region::Humidity,
                format!("Humidity: {}", format_value(&reading.value, kind.unit())),
            ),
            SensorKind::Light => (
                Region::Light,
                format!("Light: {}", format_bare(&reading.value)),
            ),
        };
        let result = self.display.set_text(region, &text);
        self.paint(region, result);

        if kind == SensorKind::Light {
            match self.light_timer.on_light(&reading.value) {
                LightTransition::Started { epoch } => {
                    debug!("Light timer started (run {})", epoch);
                    self.show_elapsed(0);
                }
                LightTransition::Stopped => {
                    debug!("Light timer stopped");
                    self.show_elapsed(0);
                }
                LightTransition::Unchanged => {}
            }
        }
    }

    fn on_samples(&mut self, batch: Vec<Value>) {
        let mut pushed = false;
        for raw in batch {
            let value = SensorValue::from_json(&raw);
            if value.as_f64().is_some() {
                self.history.push(HistoryEntry::new(Local::now(), value));
                pushed = true;
            } else {
                debug!("Skipping non-numeric temperature sample {}", raw);
            }
        }
        if pushed {
            let lines = self.history.render_lines();
            let result = self.display.render_log(&lines);
            self.paint(Region::Log, result);
        }
    }

    fn on_alerts(&mut self, raw: &Value) {
        let fields = &self.config.alert_fields;
        let state = AlertState::from_json(raw, &fields.temperature, &fields.light);
        let status = classify(&state);
        debug!("Alert state {:?} -> {:?}", state, status);

        let result = self
            .display
            .set_text(Region::Alarm, &format!("Alarm: {}", status.label));
        self.paint(Region::Alarm, result);

        let emphasis = if status.is_warning() {
            Emphasis::Alert
        } else {
            Emphasis::Calm
        };
        let result = self.display.set_emphasis(Region::Alarm, emphasis);
        self.paint(Region::Alarm, result);

        if status.is_warning() {
            if let Err(e) = self.sound.play(&self.config.alarm_tone) {
                debug!("Alarm tone not played: {}", e);
            }
        }
        self.alarm = Some(status);
    }

    fn show_elapsed(&mut self, secs: u64) {
        let result = self
            .display
            .set_text(Region::LightTimer, &format!("Light ON for: {}s", secs));
        self.paint(Region::LightTimer, result);
    }

    fn remind(&mut self) {
        info!("Light has been on for the reminder delay");
        self.show_transient(LIGHT_REMINDER_TEXT);

        if self.notifier.permission() == Permission::Granted {
            let title = self.config.notification_title.clone();
            self.notifier.notify(&title, LIGHT_REMINDER_BODY);
        } else {
            self.notifier.request_permission();
        }
    }

    /// Show the banner and schedule its auto-hide
    fn show_transient(&mut self, text: &str) {
        self.banner_generation += 1;
        let generation = self.banner_generation;

        let result = self.display.show_banner(text);
        self.paint(Region::Banner, result);

        if let Some(previous) = self.banner_hide.take() {
            previous.abort();
        }
        let delay = self.config.banner_duration();
        let events = self.timer_tx.clone();
        self.banner_hide = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(TimerEvent::BannerExpired { generation });
        }));
    }

    /// Report a display failure; a missing region is logged once and skipped
    fn paint(&mut self, region: Region, result: Result<(), DisplayError>) {
        match result {
            Ok(()) => {}
            Err(DisplayError::MissingRegion(missing)) => {
                if self.reported_missing.insert(missing) {
                    error!("{} element not found, skipping its updates", missing);
                }
            }
            Err(e) => warn!("Display update for {} failed: {}", region, e),
        }
    }
}

impl<S, D, N, A> Drop for Reactor<S, D, N, A> {
    fn drop(&mut self) {
        if let Some(hide) = self.banner_hide.take() {
            hide.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AudioError, StoreError, StoreResult};
    use crate::ports::{HistoryStream, LatestStream, SchemaLayout, Tone};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct Writes(Mutex<Vec<(String, Value)>>);

    struct RejectingSchema {
        writes: Arc<Writes>,
        reject: bool,
    }

    impl SchemaAdapter for RejectingSchema {
        fn subscribe_latest(&self, _path: &str) -> StoreResult<LatestStream> {
            Err(StoreError::Closed)
        }

        fn subscribe_history(&self, _path: &str, _limit: usize) -> StoreResult<HistoryStream> {
            Err(StoreError::Closed)
        }

        fn write(&self, path: &str, value: Value) -> StoreResult<()> {
            self.writes.0.lock().push((path.to_string(), value));
            if self.reject {
                Err(StoreError::WriteRejected {
                    path: path.to_string(),
                    reason: "permission denied".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn layout(&self) -> SchemaLayout {
            SchemaLayout::Scalar
        }
    }

    #[derive(Default)]
    struct Screen {
        texts: Vec<(Region, String)>,
        emphasis: Vec<Emphasis>,
        banners: Vec<Option<String>>,
        missing: Vec<Region>,
        attempts: usize,
    }

    impl DisplaySurface for Screen {
        fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
            self.attempts += 1;
            if self.missing.contains(&region) {
                return Err(DisplayError::MissingRegion(region));
            }
            self.texts.push((region, text.to_string()));
            Ok(())
        }

        fn set_emphasis(&mut self, _region: Region, emphasis: Emphasis) -> Result<(), DisplayError> {
            self.emphasis.push(emphasis);
            Ok(())
        }

        fn render_log(&mut self, _lines: &[String]) -> Result<(), DisplayError> {
            Ok(())
        }

        fn show_banner(&mut self, text: &str) -> Result<(), DisplayError> {
            self.banners.push(Some(text.to_string()));
            Ok(())
        }

        fn hide_banner(&mut self) -> Result<(), DisplayError> {
            self.banners.push(None);
            Ok(())
        }
    }

    struct Silent;

    impl NotificationSurface for Silent {
        fn permission(&self) -> Permission {
            Permission::Denied
        }

        fn request_permission(&mut self) -> Permission {
            Permission::Denied
        }

        fn notify(&mut self, _title: &str, _body: &str) {}
    }

    struct Muted(usize);

    impl AlarmSound for Muted {
        fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
            self.0 += 1;
            Err(AudioError::Restricted("autoplay blocked".to_string()))
        }
    }

    fn reactor(reject: bool) -> (Reactor<RejectingSchema, Screen, Silent, Muted>, Arc<Writes>) {
        let writes = Arc::new(Writes::default());
        let schema = RejectingSchema {
            writes: writes.clone(),
            reject,
        };
        let reactor = Reactor::new(
            MonitorConfig::default(),
            schema,
            Screen::default(),
            Silent,
            Muted(0),
        );
        (reactor, writes)
    }

    fn texts(reactor: &Reactor<RejectingSchema, Screen, Silent, Muted>, region: Region) -> Vec<String> {
        reactor
            .display()
            .texts
            .iter()
            .filter(|(r, _)| *r == region)
            .map(|(_, t)| t.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_sensor_text() {
        let (mut reactor, _) = reactor(false);
        reactor.deliver(Delivery::Temperature(json!(24.5)));
        reactor.deliver(Delivery::Humidity(Value::Null));
        reactor.deliver(Delivery::Light(json!("OFF")));

        assert_eq!(texts(&reactor, Region::Temperature), vec!["Temp: 24.5 °C"]);
        assert_eq!(texts(&reactor, Region::Humidity), vec!["Humidity: -- %"]);
        assert_eq!(texts(&reactor, Region::Light), vec!["Light: OFF"]);
        // Off while idle does not touch the timer display
        assert!(texts(&reactor, Region::LightTimer).is_empty());
    }

    #[tokio::test]
    async fn test_alerts_drive_label_emphasis_and_sound() {
        let (mut reactor, _) = reactor(false);
        reactor.deliver(Delivery::Alerts(
            json!({ "temperatureAlert": "HIGH", "lightAlert": "LIGHT_OFF" }),
        ));
        reactor.deliver(Delivery::Alerts(
            json!({ "temperatureAlert": "ACK", "lightAlert": "LIGHT_OFF" }),
        ));
        reactor.deliver(Delivery::Alerts(Value::Null));

        assert_eq!(
            texts(&reactor, Region::Alarm),
            vec!["Alarm: HIGH", "Alarm: ACK", "Alarm: NONE"]
        );
        assert_eq!(
            reactor.display().emphasis,
            vec![Emphasis::Alert, Emphasis::Calm, Emphasis::Calm]
        );
        // Restricted playback is swallowed
        assert_eq!(reactor.sound.0, 1);
        assert_eq!(reactor.alarm().map(|a| a.label.as_str()), Some("NONE"));
    }

    #[tokio::test]
    async fn test_acknowledge_writes_even_when_rejected() {
        let (mut reactor, writes) = reactor(true);
        reactor.acknowledge(AlertKind::Light);

        assert_eq!(
            writes.0.lock().clone(),
            vec![("/Alerts/lightAlert".to_string(), json!("ACK"))]
        );
        assert_eq!(
            reactor.display().banners,
            vec![Some("Light alarm acknowledged".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_region_is_skipped() {
        let (mut reactor, _) = reactor(false);
        reactor.display.missing.push(Region::Humidity);

        reactor.deliver(Delivery::Humidity(json!(40)));
        reactor.deliver(Delivery::Humidity(json!(41)));
        reactor.deliver(Delivery::Temperature(json!(20)));

        assert!(texts(&reactor, Region::Humidity).is_empty());
        assert_eq!(texts(&reactor, Region::Temperature), vec!["Temp: 20 °C"]);
        assert_eq!(reactor.reported_missing.len(), 1);
        assert_eq!(reactor.display().attempts, 3);
    }

    #[tokio::test]
    async fn test_samples_fill_history() {
        let (mut reactor, _) = reactor(false);
        reactor.deliver(Delivery::TemperatureSamples(vec![json!(21.0), json!("n/a"), json!("22.5")]));

        let values: Vec<String> = reactor.history().iter().map(|e| e.value.to_string()).collect();
        assert_eq!(values, vec!["21", "22.5"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_banner_expiry_ignored() {
        let (mut reactor, _) = reactor(false);
        reactor.acknowledge(AlertKind::Temperature);
        reactor.acknowledge(AlertKind::Light);

        reactor.handle_timer(TimerEvent::BannerExpired { generation: 1 });
        assert_eq!(reactor.display().banners.len(), 2);

        reactor.handle_timer(TimerEvent::BannerExpired { generation: 2 });
        assert_eq!(reactor.display().banners.last(), Some(&None));

        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn test_run_requires_session() {
        let (reactor, _) = reactor(false);
        let (_tx, rx) = watch::channel(None);
        let result = reactor.run(rx).await;
        assert!(matches!(result, Err(RoomwatchError::Unauthenticated)));
    }
}
