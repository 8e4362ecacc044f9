//! Minimal demo: mount a small tree into the terminal host, then
//! re-render it with changed content.
//!
//! ```sh
//! cargo run --example hello
//! ```

use std::io;
use std::time::Duration;

use ember_ui::host::TerminalHost;
use ember_ui::{Props, Runtime, VNode, create_node};

fn app(status: &str) -> VNode {
    let title = create_node(
        "h1",
        Props::new().with("bold", true).with("fg", "cyan"),
        vec!["Hello ember-ui".into()],
    );
    let line = create_node("p", Props::new(), vec![status.into()]);
    create_node("div", Props::new(), vec![title.into(), line.into()])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut runtime = Runtime::new(TerminalHost::new());
    let container = runtime.host_mut().container();

    runtime.render(app("mounting..."), container.clone());
    runtime.run_until_idle(Duration::from_millis(4))?;
    runtime.host_mut().present(&container, &mut io::stdout())?;

    // Re-render: only the status line's text attribute changes.
    runtime.render(app("reconciled in place"), container.clone());
    runtime.run_until_idle(Duration::from_millis(4))?;
    runtime.host_mut().present(&container, &mut io::stdout())?;

    Ok(())
}
