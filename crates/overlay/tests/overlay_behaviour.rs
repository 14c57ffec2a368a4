use common::{Color, Px};
use dom::Document;
use overlay::testing::{RecordingSink, SharedBuffer};
use overlay::{
    Channel, ErrorEvent, ErrorValue, MountState, NativeSink, OverlayConfig, OverlayContext, Value,
    Visibility,
};
use std::sync::Arc;

fn overlay_with(native: Arc<RecordingSink>) -> Arc<OverlayContext> {
    OverlayContext::with_native(
        Document::blank().into_shared(),
        OverlayConfig::default(),
        native,
    )
}

/// Line items currently in the panel as (color, inner html).
fn panel_lines(overlay: &OverlayContext) -> Vec<(String, String)> {
    let doc = overlay.document().read();
    let Some(list) = doc.query_selector("[data-overlay-messages]") else {
        return Vec::new();
    };
    doc.tree
        .children(list)
        .map(|item| {
            let color = doc
                .tree
                .get_element(item)
                .and_then(|e| e.style_property("color"))
                .unwrap_or_default()
                .to_string();
            (color, doc.inner_html(item))
        })
        .collect()
}

#[test]
fn detached_console_is_transparent() {
    let native = Arc::new(RecordingSink::new());
    let overlay = overlay_with(native.clone());

    let calls: Vec<(Channel, Vec<Value>)> = vec![
        (Channel::Log, vec!["a".into(), 1.into()]),
        (Channel::Warn, vec![Value::Object, Value::Null]),
        (Channel::Error, vec![]),
        (Channel::Log, vec![Value::Array(vec![1.into(), 2.into()])]),
    ];
    for (channel, args) in &calls {
        overlay.console().print(*channel, args.clone());
    }

    let delivered: Vec<(Channel, Vec<Value>)> = native
        .records()
        .into_iter()
        .map(|r| (r.channel, r.args))
        .collect();
    assert_eq!(delivered, calls);
    assert!(panel_lines(&overlay).is_empty());
}

#[test]
fn native_output_matches_plain_console() {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    let native = Arc::new(NativeSink::with_writers(Box::new(out.clone()), Box::new(err.clone())));
    let overlay = OverlayContext::with_native(
        Document::blank().into_shared(),
        OverlayConfig::default(),
        native,
    );

    overlay.log(vec!["count".into(), 3.into()]);
    overlay.error(vec!["bad".into()]);

    assert_eq!(out.lines(), vec!["count 3"]);
    assert_eq!(err.lines(), vec!["[ERROR] bad"]);
}

#[test]
fn attached_lines_keep_order_and_color() {
    let native = Arc::new(RecordingSink::new());
    let overlay = overlay_with(native.clone());
    overlay.enable();

    overlay.log(vec!["one".into()]);
    overlay.error(vec!["two".into(), 2.into()]);
    overlay.warn(vec!["<i>three</i>".into()]);

    let colors = &overlay.config().colors;
    assert_eq!(
        panel_lines(&overlay),
        vec![
            (colors.log.to_css(), "one".to_string()),
            (colors.error.to_css(), "two 2".to_string()),
            (colors.warn.to_css(), "<i>three</i>".to_string()),
        ]
    );
    assert!(native.records().is_empty());
}

#[test]
fn enable_twice_yields_one_panel() {
    let overlay = overlay_with(Arc::new(RecordingSink::new()));
    assert!(overlay.enable());
    assert!(!overlay.enable());
    assert_eq!(
        overlay.document().read().query_selector_all("[data-debug-overlay]").len(),
        1
    );

    assert!(overlay.disable());
    assert!(!overlay.disable());
    assert!(overlay.document().read().query_selector_all("[data-debug-overlay]").is_empty());
    assert_eq!(overlay.panel().mount_state(), MountState::Detached);
}

#[test]
fn shared_context_is_one_instance() {
    let overlay = overlay_with(Arc::new(RecordingSink::new()));
    let a = Arc::clone(&overlay);
    let b = Arc::clone(&overlay);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(a.panel(), b.panel()));
    assert!(Arc::ptr_eq(a.console(), b.console()));

    a.enable();
    b.log(vec!["via b".into()]);
    assert_eq!(panel_lines(&a).len(), 1);
}

#[test]
fn uncaught_error_stack_renders_links() {
    let overlay = overlay_with(Arc::new(RecordingSink::new()));
    overlay.enable();

    let event = ErrorEvent::new("Uncaught Error: boom")
        .at("http://x.com/test.js", 130, 32)
        .with_error(ErrorValue {
            name: "Error".into(),
            message: "boom".into(),
            stack: Some(
                "Error: boom\n    at foo (http://x.com/test.js:130:32)\n    at http://x.com/app.js:10:5"
                    .into(),
            ),
        });
    assert!(overlay.errors().dispatch(&event));

    let doc = overlay.document().read();
    let links = doc.query_selector_all("a");
    let described: Vec<(String, String)> = links
        .iter()
        .map(|&a| {
            let href = doc.tree.get_element(a).and_then(|e| e.get_attribute("href"));
            (href.unwrap_or_default().to_string(), doc.tree.get_text_content(a))
        })
        .collect();
    assert_eq!(
        described,
        vec![
            ("http://x.com/test.js".to_string(), "test.js:".to_string()),
            ("http://x.com/app.js".to_string(), "app.js:".to_string()),
        ]
    );
    assert_eq!(doc.query_selector_all("br").len(), 1);
    drop(doc);

    let lines = panel_lines(&overlay);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, Color::rgb(255, 99, 71).to_css());
    assert!(lines[0].1.starts_with("&nbsp;&nbsp;&nbsp;&nbsp;foo <a"));
}

#[test]
fn uncaught_error_without_stack_forwards_info() {
    let native = Arc::new(RecordingSink::new());
    let overlay = overlay_with(native.clone());

    let event = ErrorEvent::new("Uncaught ReferenceError: x is not defined");
    assert!(!overlay.errors().dispatch(&event));
    assert!(native.records().is_empty());

    overlay.enable();
    assert!(overlay.errors().dispatch(&event));
    assert_eq!(
        panel_lines(&overlay),
        vec![(
            overlay.config().colors.error.to_css(),
            "Uncaught ReferenceError: x is not defined".to_string()
        )]
    );
}

#[test]
fn visibility_geometry() {
    let overlay = overlay_with(Arc::new(RecordingSink::new()));
    overlay.enable();
    let bottom = |overlay: &OverlayContext| {
        let doc = overlay.document().read();
        let root = doc.query_selector("[data-debug-overlay]").unwrap();
        doc.tree
            .get_element(root)
            .and_then(|e| e.style_property("bottom"))
            .map(str::to_string)
    };
    assert_eq!(bottom(&overlay).as_deref(), Some("-160px"));

    assert!(overlay.show());
    assert_eq!(overlay.panel().offset(), Px::ZERO);
    assert_eq!(bottom(&overlay).as_deref(), Some("0px"));
    assert!(!overlay.show());
    assert_eq!(overlay.panel().offset(), Px::ZERO);

    assert!(overlay.hide());
    assert!(!overlay.hide());
    assert_eq!(overlay.panel().offset(), Px(-160.0));
    assert_eq!(overlay.panel().visibility(), Visibility::Hidden);
    assert_eq!(bottom(&overlay).as_deref(), Some("-160px"));
}

#[test]
fn compact_config_changes_geometry() {
    let overlay = OverlayContext::with_native(
        Document::blank().into_shared(),
        OverlayConfig::compact(),
        Arc::new(RecordingSink::new()),
    );
    overlay.enable();
    overlay.show();
    overlay.hide();
    assert_eq!(overlay.panel().offset(), Px(-90.0));
}
