
#[cfg(target_os = "macos")]
mod demo {
    use cacao::appkit::{Alert, App, AppDelegate};
    use log::info;

    // Smallest possible host app: offers the move on launch, otherwise says where
    // it's running from.
    struct MoverDemoDelegate;

    impl AppDelegate for MoverDemoDelegate {
        fn did_finish_launching(&self) {
            if app_mover::move_if_necessary() {
                info!("Relaunching from the Applications folder");
                return;
            }

            let location = app_mover::misc::current_bundle()
                .map(|x| x.display().to_string())
                .unwrap_or_else(|e| e);
            Alert::new("App Mover Demo", &format!("Running from {location}")).show();
            App::terminate();
        }
    }

    pub fn run() {
        App::new("com.example.AppMoverDemo", MoverDemoDelegate).run();
    }
}

fn main() {
    app_mover::logging::init_log();

    #[cfg(target_os = "macos")]
    demo::run();

    #[cfg(not(target_os = "macos"))]
    eprintln!("app-mover-demo only runs on macOS");
}
