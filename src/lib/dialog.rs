use log::info;

pub struct Prompt {
    pub message: String,
    pub informative: String,
    pub move_button: String,
    pub cancel_button: String,
}

// Blocks until the user picks a button. True means move.
#[cfg(target_os = "macos")]
pub fn confirm(prompt: &Prompt) -> bool {
    use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

    let result = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(prompt.message.as_str())
        .set_description(prompt.informative.as_str())
        .set_buttons(MessageButtons::OkCancelCustom(
            prompt.move_button.clone(),
            prompt.cancel_button.clone(),
        ))
        .show();

    info!("Move prompt answered {result:?}");
    match result {
        MessageDialogResult::Ok | MessageDialogResult::Yes => true,
        MessageDialogResult::Custom(label) => label == prompt.move_button,
        _ => false,
    }
}

#[cfg(not(target_os = "macos"))]
pub fn confirm(prompt: &Prompt) -> bool {
    info!("No dialog support on this platform, declining '{}'", prompt.message);
    false
}

// Otherwise the prompt can end up behind the "downloaded from the internet" warning.
#[cfg(target_os = "macos")]
pub fn activate() {
    activate_unless(is_active, cacao::appkit::App::activate);
}

#[cfg(not(target_os = "macos"))]
pub fn activate() {}

// Returns whether `activate` ran.
pub fn activate_unless<A, B>(is_active: A, activate: B) -> bool
where
    A: FnOnce() -> bool,
    B: FnOnce(),
{
    if is_active() {
        return false;
    }
    activate();
    true
}

#[cfg(target_os = "macos")]
fn is_active() -> bool {
    use objc::runtime::{Object, BOOL, NO};
    use objc::{class, msg_send, sel, sel_impl};

    unsafe {
        let app: *mut Object = msg_send![class!(NSApplication), sharedApplication];
        let active: BOOL = msg_send![app, isActive];
        active != NO
    }
}

#[cfg(target_os = "macos")]
pub fn terminate() -> ! {
    info!("Terminating");
    cacao::appkit::App::terminate();
    // Only reached without a running NSApplication.
    std::process::exit(1)
}

#[cfg(not(target_os = "macos"))]
pub fn terminate() -> ! {
    info!("Terminating");
    std::process::exit(1)
}

// AppKit may be mid-event on the main thread; exiting from a helper thread would
// run atexit handlers underneath it.
#[cfg(target_os = "macos")]
pub fn exit_on_main_thread() {
    cacao::dispatch::Queue::main().exec_async(|| std::process::exit(0));
}

#[cfg(not(target_os = "macos"))]
pub fn exit_on_main_thread() {
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    #[test]
    fn activates_only_when_inactive() {
        let calls = Cell::new(0);
        assert!(!activate_unless(|| true, || calls.set(calls.get() + 1)));
        assert_eq!(calls.get(), 0);

        assert!(activate_unless(|| false, || calls.set(calls.get() + 1)));
        assert_eq!(calls.get(), 1);
    }
}
