//! Chart engine interop.
//!
//! ECharts is loaded by the host page as a global (`window.echarts`). Mounted
//! instances live in a `window.__dashCharts` registry keyed by container id,
//! next to the resize listener registered for them. Rust owns each instance
//! through a [`ChartHandle`], which disposes it when dropped.

use crate::theme::Theme;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

/// The operations a page needs from a chart engine.
pub trait ChartBackend {
    /// Whether the container element is in the DOM.
    fn container_ready(&self, container_id: &str) -> bool;
    /// Create an instance in the container. `false` if the engine is not loaded.
    fn init(&self, container_id: &str, theme: Theme) -> bool;
    /// Replace the whole option of the instance.
    fn set_option(&self, container_id: &str, option: &Value);
    /// Call `handler` with the data index of clicked points.
    fn on_point_click(&self, container_id: &str, handler: Box<dyn Fn(usize)>);
    /// Dispose the instance and remove its resize listener.
    fn dispose(&self, container_id: &str);
    /// PNG data URL rendered by the engine itself.
    fn export_engine_png(&self, container_id: &str, background: &str) -> Option<String>;
    /// PNG data URL read back from the container canvas.
    fn export_canvas_png(&self, container_id: &str) -> Option<String>;
    /// Offer `data_url` to the user as a file download.
    fn download(&self, data_url: &str, file_name: &str);
}

/// Which export path produced the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPath {
    Engine,
    Canvas,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Neither the engine nor the canvas produced an image.
    Unavailable { container: String },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Unavailable { container } => {
                write!(f, "could not export chart '{container}' as an image")
            }
        }
    }
}

impl std::error::Error for ExportError {}

/// One mounted chart instance. Dropping the handle disposes the instance.
pub struct ChartHandle<B: ChartBackend> {
    backend: B,
    container_id: String,
    theme: Theme,
}

impl<B: ChartBackend> ChartHandle<B> {
    /// Mount a chart in `container_id`.
    ///
    /// Returns `None` when the container is not in the DOM yet or the engine
    /// has not loaded; the caller retries on a later render.
    pub fn mount(backend: B, container_id: impl Into<String>, theme: Theme) -> Option<Self> {
        let container_id = container_id.into();
        if !backend.container_ready(&container_id) {
            log::debug!("chart container '{container_id}' not ready");
            return None;
        }
        if !backend.init(&container_id, theme) {
            log::debug!("chart engine not ready for '{container_id}'");
            return None;
        }
        log::info!("mounted chart '{container_id}' ({theme:?})");
        Some(Self {
            backend,
            container_id,
            theme,
        })
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_option(&self, option: &Value) {
        self.backend.set_option(&self.container_id, option);
    }

    pub fn on_point_click(&self, handler: impl Fn(usize) + 'static) {
        self.backend
            .on_point_click(&self.container_id, Box::new(handler));
    }

    /// Download the chart as `file_name`, falling back to the raw canvas when
    /// the engine cannot render an image.
    pub fn export_png(&self, file_name: &str) -> Result<ExportPath, ExportError> {
        let (background, _) = self.theme.page_colors();
        let (data_url, path) =
            match self.backend.export_engine_png(&self.container_id, background) {
                Some(url) => (url, ExportPath::Engine),
                None => {
                    log::warn!("engine export failed for '{}', trying canvas", self.container_id);
                    let url = self
                        .backend
                        .export_canvas_png(&self.container_id)
                        .ok_or_else(|| ExportError::Unavailable {
                            container: self.container_id.clone(),
                        })?;
                    (url, ExportPath::Canvas)
                }
            };
        self.backend.download(&data_url, file_name);
        Ok(path)
    }
}

impl<B: ChartBackend> Drop for ChartHandle<B> {
    fn drop(&mut self) {
        log::debug!("disposing chart '{}'", self.container_id);
        self.backend.dispose(&self.container_id);
    }
}

/// Run `code`, swallowing JS exceptions.
fn eval(code: &str) -> Option<JsValue> {
    let wrapped = format!(
        "(function() {{ try {{ return (function() {{ {code} }})(); }} catch(e) {{ console.warn('dash chart call failed:', e); return null; }} }})()"
    );
    js_sys::eval(&wrapped).ok()
}

fn quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// [`ChartBackend`] backed by the global ECharts library.
#[derive(Default)]
pub struct EchartsBridge {
    click: RefCell<Option<Closure<dyn Fn(JsValue)>>>,
}

impl EchartsBridge {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartBackend for EchartsBridge {
    fn container_ready(&self, container_id: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .is_some()
    }

    fn init(&self, container_id: &str, theme: Theme) -> bool {
        let id = quoted(container_id);
        let engine_theme = theme.engine_theme().map(quoted).unwrap_or_else(|| "undefined".to_string());
        let code = format!(
            r#"
            if (typeof window.echarts === 'undefined') return false;
            var reg = window.__dashCharts = window.__dashCharts || {{}};
            var el = document.getElementById({id});
            if (!el) return false;
            var chart = window.echarts.init(el, {engine_theme});
            var onResize = function() {{ chart.resize(); }};
            window.addEventListener('resize', onResize);
            reg[{id}] = {{ chart: chart, onResize: onResize }};
            return true;
            "#
        );
        eval(&code).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn set_option(&self, container_id: &str, option: &Value) {
        let id = quoted(container_id);
        let code = format!(
            "var e = (window.__dashCharts || {{}})[{id}]; if (e) e.chart.setOption({option}, true);"
        );
        eval(&code);
    }

    fn on_point_click(&self, container_id: &str, handler: Box<dyn Fn(usize)>) {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |index: JsValue| {
            if let Some(i) = index.as_f64() {
                handler(i as usize);
            }
        });
        let id = quoted(container_id);
        let Some(entry) = eval(&format!("return (window.__dashCharts || {{}})[{id}];")) else {
            return;
        };
        if entry.is_undefined() || entry.is_null() {
            return;
        }
        if js_sys::Reflect::set(&entry, &JsValue::from_str("onClick"), closure.as_ref()).is_err() {
            return;
        }
        eval(&format!(
            r#"
            var e = window.__dashCharts[{id}];
            e.chart.off('click');
            e.chart.on('click', function(p) {{
                if (typeof p.dataIndex === 'number') e.onClick(p.dataIndex);
            }});
            "#
        ));
        // Replacing the closure drops the previous handler.
        *self.click.borrow_mut() = Some(closure);
    }

    fn dispose(&self, container_id: &str) {
        let id = quoted(container_id);
        eval(&format!(
            r#"
            var reg = window.__dashCharts || {{}};
            var e = reg[{id}];
            if (!e) return;
            window.removeEventListener('resize', e.onResize);
            e.chart.off('click');
            e.chart.dispose();
            delete reg[{id}];
            "#
        ));
        self.click.borrow_mut().take();
    }

    fn export_engine_png(&self, container_id: &str, background: &str) -> Option<String> {
        let id = quoted(container_id);
        let background = quoted(background);
        eval(&format!(
            "var e = (window.__dashCharts || {{}})[{id}]; if (!e) return null; \
             return e.chart.getDataURL({{ type: 'png', pixelRatio: 2, backgroundColor: {background} }});"
        ))
        .and_then(|v| v.as_string())
        .filter(|url| url.starts_with("data:image/png"))
    }

    fn export_canvas_png(&self, container_id: &str) -> Option<String> {
        let id = quoted(container_id);
        eval(&format!(
            "var el = document.getElementById({id}); var c = el && el.querySelector('canvas'); \
             return c ? c.toDataURL('image/png') : null;"
        ))
        .and_then(|v| v.as_string())
        .filter(|url| url.starts_with("data:image/png"))
    }

    fn download(&self, data_url: &str, file_name: &str) {
        let url = quoted(data_url);
        let name = quoted(file_name);
        eval(&format!(
            "var a = document.createElement('a'); a.href = {url}; a.download = {name}; \
             document.body.appendChild(a); a.click(); document.body.removeChild(a);"
        ));
    }
}

/// Resolve after `ms` milliseconds. Used to poll for the engine script.
pub async fn wait_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingBackend {
        log: Rc<RefCell<Vec<String>>>,
        missing_container: bool,
        engine_missing: bool,
        engine_png: Option<String>,
        canvas_png: Option<String>,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn record(&self, call: String) {
            self.log.borrow_mut().push(call);
        }
    }

    impl ChartBackend for RecordingBackend {
        fn container_ready(&self, _container_id: &str) -> bool {
            !self.missing_container
        }

        fn init(&self, container_id: &str, theme: Theme) -> bool {
            if self.engine_missing {
                return false;
            }
            self.record(format!("init {container_id} {theme:?}"));
            true
        }

        fn set_option(&self, container_id: &str, option: &Value) {
            self.record(format!("option {container_id} {option}"));
        }

        fn on_point_click(&self, container_id: &str, handler: Box<dyn Fn(usize)>) {
            self.record(format!("click {container_id}"));
            handler(3);
        }

        fn dispose(&self, container_id: &str) {
            self.record(format!("dispose {container_id}"));
        }

        fn export_engine_png(&self, _container_id: &str, _background: &str) -> Option<String> {
            self.engine_png.clone()
        }

        fn export_canvas_png(&self, _container_id: &str) -> Option<String> {
            self.canvas_png.clone()
        }

        fn download(&self, data_url: &str, file_name: &str) {
            self.record(format!("download {file_name} {data_url}"));
        }
    }

    #[test]
    fn test_mount_skips_missing_container() {
        let backend = RecordingBackend {
            missing_container: true,
            ..Default::default()
        };
        assert!(ChartHandle::mount(backend.clone(), "chart", Theme::Light).is_none());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_mount_skips_unloaded_engine() {
        let backend = RecordingBackend {
            engine_missing: true,
            ..Default::default()
        };
        assert!(ChartHandle::mount(backend.clone(), "chart", Theme::Light).is_none());
        // nothing was created, so nothing is disposed
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_drop_disposes_instance() {
        let backend = RecordingBackend::default();
        let handle = ChartHandle::mount(backend.clone(), "chart", Theme::Dark).unwrap();
        handle.set_option(&json!({ "series": [] }));
        drop(handle);
        assert_eq!(
            backend.calls(),
            vec![
                "init chart Dark".to_string(),
                r#"option chart {"series":[]}"#.to_string(),
                "dispose chart".to_string(),
            ]
        );
    }

    #[test]
    fn test_theme_change_disposes_before_remount() {
        let backend = RecordingBackend::default();
        let mut slot = ChartHandle::mount(backend.clone(), "chart", Theme::Light);
        drop(slot.take());
        slot = ChartHandle::mount(backend.clone(), "chart", Theme::Dark);
        assert_eq!(slot.as_ref().map(|h| h.theme()), Some(Theme::Dark));
        assert_eq!(
            backend.calls(),
            vec!["init chart Light", "dispose chart", "init chart Dark"]
        );
    }

    #[test]
    fn test_point_click_reaches_handler() {
        let backend = RecordingBackend::default();
        let handle = ChartHandle::mount(backend.clone(), "chart", Theme::Light).unwrap();
        let clicked = Rc::new(RefCell::new(None));
        let sink = clicked.clone();
        handle.on_point_click(move |i| *sink.borrow_mut() = Some(i));
        assert_eq!(*clicked.borrow(), Some(3));
    }

    #[test]
    fn test_export_prefers_engine() {
        let backend = RecordingBackend {
            engine_png: Some("data:image/png;engine".to_string()),
            canvas_png: Some("data:image/png;canvas".to_string()),
            ..Default::default()
        };
        let handle = ChartHandle::mount(backend.clone(), "chart", Theme::Light).unwrap();
        assert_eq!(handle.export_png("a.png"), Ok(ExportPath::Engine));
        assert!(backend
            .calls()
            .contains(&"download a.png data:image/png;engine".to_string()));
    }

    #[test]
    fn test_export_falls_back_to_canvas() {
        let backend = RecordingBackend {
            canvas_png: Some("data:image/png;canvas".to_string()),
            ..Default::default()
        };
        let handle = ChartHandle::mount(backend.clone(), "chart", Theme::Light).unwrap();
        assert_eq!(handle.export_png("a.png"), Ok(ExportPath::Canvas));
    }

    #[test]
    fn test_export_reports_failure() {
        let backend = RecordingBackend::default();
        let handle = ChartHandle::mount(backend.clone(), "chart", Theme::Light).unwrap();
        let err = handle.export_png("a.png").unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not export chart 'chart' as an image"
        );
        assert!(!backend.calls().iter().any(|c| c.starts_with("download")));
    }
}
