//! Editing session: single-writer document ownership, debounced barcode
//! re-encoding, and print/save/load orchestration.
//!
//! All mutations go through the session's mutex — encode results are
//! applied back through the same lock, never from concurrent callbacks.
//! Rapid content edits to one barcode element are coalesced so at most one
//! re-encode runs per settling interval.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use label_model::{
    project, scale_document, scale_factor, DocumentEvent, ElementKind, LabelDocument,
    LabelElement, ScaleError, SerializationError,
};
use symbology::Symbology;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use zpl_stream::{
    assemble, render_stream, transport, AssembleError, RenderOptions, SceneRasterizer,
    TransportError,
};

use crate::config::AppConfig;

/// Capacity of the re-encode request channel.
const ENCODE_QUEUE_CAPACITY: usize = 100;

/// Capacity of the document event channel.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("element {0:?} not found")]
    ElementNotFound(String),
}

/// One editing session owning one document.
pub struct EditorSession {
    config: AppConfig,
    doc: Arc<Mutex<LabelDocument>>,
    events: broadcast::Sender<DocumentEvent>,
    encode_tx: mpsc::Sender<String>,
    rasterizer: Option<Box<dyn SceneRasterizer + Send + Sync>>,
}

impl EditorSession {
    /// Create a session around an empty document and start the encode
    /// worker. Must run inside a tokio runtime.
    pub fn new(config: AppConfig) -> Self {
        Self::with_document(config, LabelDocument::default())
    }

    pub fn with_document(config: AppConfig, document: LabelDocument) -> Self {
        let doc = Arc::new(Mutex::new(document));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (encode_tx, encode_rx) = mpsc::channel(ENCODE_QUEUE_CAPACITY);

        tokio::spawn(encode_worker(
            doc.clone(),
            events.clone(),
            encode_rx,
            config.scale(),
            Duration::from_millis(config.encode_debounce_ms),
        ));

        Self { config, doc, events, encode_tx, rasterizer: None }
    }

    /// Attach the external scene compositor used by the whole-canvas
    /// print strategy.
    pub fn with_rasterizer(mut self, r: Box<dyn SceneRasterizer + Send + Sync>) -> Self {
        self.rasterizer = Some(r);
        self
    }

    /// Subscribe to document change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current document.
    pub async fn document(&self) -> LabelDocument {
        self.doc.lock().await.clone()
    }

    // -- Mutations --

    /// Add an element; barcode kinds get an initial encode queued.
    pub async fn add_element(&self, element: LabelElement) -> String {
        let is_barcode = element.kind.is_barcode();
        let name = self.doc.lock().await.add_element(element);
        self.emit(DocumentEvent::ElementAdded { name: name.clone() });
        if is_barcode {
            self.request_encode(&name);
        }
        name
    }

    /// Replace an element's content; barcode kinds get a re-encode queued.
    pub async fn set_content(&self, name: &str, content: &str) -> Result<(), SessionError> {
        let kind = {
            let mut doc = self.doc.lock().await;
            let el = doc
                .element_mut(name)
                .ok_or_else(|| SessionError::ElementNotFound(name.to_string()))?;
            el.content = content.to_string();
            el.kind
        };
        self.emit(DocumentEvent::ElementChanged { name: name.to_string() });
        if kind.is_barcode() {
            self.request_encode(name);
        }
        Ok(())
    }

    pub async fn move_element(&self, name: &str, x: f64, y: f64) -> Result<(), SessionError> {
        {
            let mut doc = self.doc.lock().await;
            let el = doc
                .element_mut(name)
                .ok_or_else(|| SessionError::ElementNotFound(name.to_string()))?;
            el.set_position(x, y);
        }
        self.emit(DocumentEvent::ElementChanged { name: name.to_string() });
        Ok(())
    }

    /// Resize an element; barcode rasters are re-encoded at the new size.
    pub async fn resize_element(
        &self,
        name: &str,
        width: f64,
        height: f64,
    ) -> Result<(), SessionError> {
        let kind = {
            let mut doc = self.doc.lock().await;
            let el = doc
                .element_mut(name)
                .ok_or_else(|| SessionError::ElementNotFound(name.to_string()))?;
            el.set_size(width, height);
            el.kind
        };
        self.emit(DocumentEvent::ElementChanged { name: name.to_string() });
        if kind.is_barcode() {
            self.request_encode(name);
        }
        Ok(())
    }

    pub async fn remove_element(&self, name: &str) -> Result<(), SessionError> {
        let removed = self.doc.lock().await.remove_element(name);
        match removed {
            Some(_) => {
                self.emit(DocumentEvent::ElementRemoved { name: name.to_string() });
                Ok(())
            }
            None => Err(SessionError::ElementNotFound(name.to_string())),
        }
    }

    pub async fn clear(&self) {
        self.doc.lock().await.clear();
        self.emit(DocumentEvent::Cleared);
    }

    pub async fn set_label_size(&self, width: f64, height: f64) {
        self.doc.lock().await.set_size(width, height);
        self.emit(DocumentEvent::Resized { width, height });
    }

    // -- Pipeline --

    /// Encode every barcode element right now, bypassing the debounce.
    /// Failures stay local to their element; returns the refreshed count.
    pub async fn encode_all(&self) -> usize {
        let names: Vec<String> = {
            let doc = self.doc.lock().await;
            doc.elements
                .iter()
                .filter(|e| e.kind.is_barcode())
                .map(|e| e.name.clone())
                .collect()
        };
        let mut refreshed = 0;
        for name in &names {
            if encode_one(&self.doc, &self.events, self.config.scale(), name).await {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Scale, assemble and transmit the document to the configured printer.
    pub async fn print(&self) -> Result<(), SessionError> {
        let doc = self.document().await;
        let factor = scale_factor(f64::from(self.config.printer_dpi), f64::from(self.config.design_dpi))?;
        let scaled = scale_document(&doc, factor)?;
        let options = RenderOptions {
            printer_dpi: self.config.printer_dpi,
            design_dpi: self.config.design_dpi,
            strategy: self.config.strategy,
        };
        let rasterizer = self.rasterizer.as_deref().map(|r| r as &dyn SceneRasterizer);
        let commands = assemble(&scaled, &options, rasterizer)?;
        let stream = render_stream(&commands);

        transport::send(
            &self.config.printer_host,
            self.config.printer_port,
            &stream,
            Duration::from_millis(self.config.send_timeout_ms),
        )
        .await?;
        info!(elements = doc.elements.len(), "Label printed");
        Ok(())
    }

    /// Connect-only reachability check against the configured printer.
    pub async fn probe_printer(&self) -> bool {
        transport::probe(
            &self.config.printer_host,
            self.config.printer_port,
            Duration::from_millis(self.config.send_timeout_ms),
        )
        .await
    }

    pub async fn save_project(&self, path: &Path) -> Result<(), SessionError> {
        let doc = self.document().await;
        project::save_to_file(&doc, path)?;
        Ok(())
    }

    /// Replace the session document with one loaded from disk and queue a
    /// raster refresh for its barcode elements.
    pub async fn load_project(&self, path: &Path) -> Result<(), SessionError> {
        let loaded = project::load_from_file(path)?;
        let barcode_names: Vec<String> = loaded
            .elements
            .iter()
            .filter(|e| e.kind.is_barcode())
            .map(|e| e.name.clone())
            .collect();
        *self.doc.lock().await = loaded;
        self.emit(DocumentEvent::Cleared);
        for name in &barcode_names {
            self.request_encode(name);
        }
        Ok(())
    }

    fn emit(&self, event: DocumentEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn request_encode(&self, name: &str) {
        if self.encode_tx.try_send(name.to_string()).is_err() {
            warn!(element = name, "Encode queue full, dropping request");
        }
    }
}

/// Background worker: debounce re-encode requests per element, then apply
/// results back through the document mutex.
async fn encode_worker(
    doc: Arc<Mutex<LabelDocument>>,
    events: broadcast::Sender<DocumentEvent>,
    mut rx: mpsc::Receiver<String>,
    scale: f64,
    debounce: Duration,
) {
    let mut pending: HashMap<String, Instant> = HashMap::new();
    loop {
        let next = pending.values().min().copied();
        tokio::select! {
            request = rx.recv() => match request {
                Some(name) => {
                    // Later edits push the element's deadline out.
                    pending.insert(name, Instant::now() + debounce);
                }
                None => break,
            },
            _ = tokio::time::sleep_until(next.unwrap_or_else(Instant::now)), if next.is_some() => {
                let now = Instant::now();
                let due: Vec<String> = pending
                    .iter()
                    .filter(|(_, deadline)| **deadline <= now)
                    .map(|(name, _)| name.clone())
                    .collect();
                for name in due {
                    pending.remove(&name);
                    encode_one(&doc, &events, scale, &name).await;
                }
            }
        }
    }
    debug!("Encode worker stopped");
}

fn symbology_for(kind: ElementKind) -> Option<Symbology> {
    match kind {
        ElementKind::QrCode => Some(Symbology::QrCode),
        ElementKind::Ean13 => Some(Symbology::Ean13),
        ElementKind::Code128 => Some(Symbology::Code128),
        ElementKind::DataMatrix => Some(Symbology::DataMatrix),
        ElementKind::Text | ElementKind::Image => None,
    }
}

/// Target raster size in printer pixels for a barcode element. Elements
/// without explicit bounds fall back to the symbology's default policy.
fn target_size(kind: Symbology, content_len: usize, width: f64, height: f64, scale: f64) -> (u32, u32) {
    let mut w = (width * scale).round() as u32;
    let mut h = (height * scale).round() as u32;
    if w == 0 {
        w = match kind {
            Symbology::Code128 => symbology::code128::default_width(content_len),
            _ => 200,
        };
    }
    if h == 0 {
        h = match kind {
            Symbology::QrCode | Symbology::DataMatrix => w,
            _ => 100,
        };
    }
    (w, h)
}

/// Encode one element and write the raster back, if the element still
/// exists with unchanged content. Returns true when a raster was applied;
/// on failure the element keeps its last-good raster.
async fn encode_one(
    doc: &Mutex<LabelDocument>,
    events: &broadcast::Sender<DocumentEvent>,
    scale: f64,
    name: &str,
) -> bool {
    let snapshot = {
        let doc = doc.lock().await;
        match doc.element(name) {
            Some(el) => (el.kind, el.content.clone(), el.width, el.height),
            None => return false,
        }
    };
    let (kind, content, width, height) = snapshot;
    let Some(symbology) = symbology_for(kind) else {
        return false;
    };
    if content.is_empty() {
        warn!(element = name, "Barcode content is empty, skipping encode");
        return false;
    }

    let (w, h) = target_size(symbology, content.len(), width, height, scale);
    let raster = match symbology::encode(symbology, &content, w, h) {
        Ok(img) => img,
        Err(e) => {
            warn!(element = name, %symbology, "Encode failed, keeping last-good raster: {e}");
            return false;
        }
    };

    let mut png = std::io::Cursor::new(Vec::new());
    if let Err(e) =
        image::DynamicImage::ImageLuma8(raster).write_to(&mut png, image::ImageFormat::Png)
    {
        warn!(element = name, "PNG encode failed: {e}");
        return false;
    }

    let mut doc = doc.lock().await;
    match doc.element_mut(name) {
        // Stale result: the element changed (or vanished) while encoding.
        Some(el) if el.content == content => {
            el.set_data(png.into_inner());
            drop(doc);
            let _ = events.send(DocumentEvent::ElementChanged { name: name.to_string() });
            debug!(element = name, %symbology, w, h, "Raster refreshed");
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn test_config() -> AppConfig {
        AppConfig {
            printer_host: "127.0.0.1".into(),
            encode_debounce_ms: 50,
            send_timeout_ms: 1000,
            ..AppConfig::default()
        }
    }

    fn ean_element() -> LabelElement {
        LabelElement::barcode("ean", ElementKind::Ean13, "123456789012", 5.0, 5.0, 120.0, 40.0)
    }

    #[tokio::test]
    async fn rapid_edits_coalesce_to_one_encode() {
        let session = EditorSession::new(test_config());
        session.add_element(ean_element()).await;
        let mut rx = session.subscribe();

        for digits in ["111111111111", "222222222222", "333333333333", "444444444444"] {
            session.set_content("ean", digits).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        let mut changed = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, DocumentEvent::ElementChanged { .. }) {
                changed += 1;
            }
        }
        // 4 edit notifications plus exactly one raster writeback
        assert_eq!(changed, 5);

        let doc = session.document().await;
        let data = doc.element("ean").unwrap().data.clone().unwrap();
        let img = image::load_from_memory(&data).unwrap();
        assert!(img.width() > 0);
    }

    #[tokio::test]
    async fn failed_encode_keeps_last_good_raster() {
        let session = EditorSession::new(test_config());
        session.add_element(ean_element()).await;
        assert_eq!(session.encode_all().await, 1);
        let good = session.document().await.element("ean").unwrap().data.clone();
        assert!(good.is_some());

        session.set_content("ean", "not-digits").await.unwrap();
        assert_eq!(session.encode_all().await, 0);
        let after = session.document().await.element("ean").unwrap().data.clone();
        assert_eq!(after, good);
    }

    #[tokio::test]
    async fn print_sends_assembled_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = String::new();
            sock.read_to_string(&mut buf).await.unwrap();
            buf
        });

        let config = AppConfig { printer_port: port, ..test_config() };
        let session = EditorSession::new(config);
        session
            .add_element(LabelElement::text("title", "Edit Me", 50.0, 50.0, 120.0, 30.0))
            .await;
        session.print().await.unwrap();

        let received = server.await.unwrap();
        assert!(received.starts_with("^XA\n^MUd,96,304\n"));
        assert!(received.contains("^FDEdit Me^FS"));
        assert!(received.ends_with("^XZ\n"));
    }

    #[tokio::test]
    async fn print_to_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = AppConfig { printer_port: port, ..test_config() };
        let session = EditorSession::new(config);
        let err = session.print().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transport(TransportError::Unreachable { .. })
        ));
    }

    #[tokio::test]
    async fn project_round_trip_through_session() {
        let dir = std::env::temp_dir().join("labelpress-session-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roundtrip.json");

        let session = EditorSession::new(test_config());
        session.add_element(ean_element()).await;
        session.encode_all().await;
        let before = session.document().await;
        session.save_project(&path).await.unwrap();

        let other = EditorSession::new(test_config());
        other.load_project(&path).await.unwrap();
        let after = other.document().await;
        assert_eq!(after, before);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn stale_encode_result_is_discarded() {
        let session = EditorSession::new(test_config());
        session.add_element(ean_element()).await;
        session.encode_all().await;

        // Remove the element; queued debounce encodes must not resurrect it.
        session.remove_element("ean").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(session.document().await.element("ean").is_none());
    }
}
