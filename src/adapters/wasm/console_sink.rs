use crate::ports::ConsoleSinkPort;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = groupCollapsed)]
    fn group_collapsed(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = groupEnd)]
    fn group_end();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSinkPort for ConsoleSink {
    fn line(&self, line: &str) {
        log(line);
    }

    fn warn(&self, message: &str) {
        warn(message);
    }

    fn group(&self, label: &str, body: &[String]) {
        group_collapsed(label);
        for line in body {
            log(line);
        }
        group_end();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_sink_all_methods() {
        let sink = ConsoleSink::new();
        sink.line("test line");
        sink.warn("test warn");
        sink.group("[test] [INFO]", &["body".to_string()]);
    }
}
