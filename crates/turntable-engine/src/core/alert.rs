use std::io::Write;

/// Blocking user-visible notification.
///
/// Used once for fatal setup failures before the demo aborts.
pub trait Alert {
    fn notify(&self, title: &str, message: &str);
}

/// Reports through the `error` log level and synchronously on stderr.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn notify(&self, title: &str, message: &str) {
        log::error!("{title}: {message}");

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{title}\n  {message}");
        let _ = stderr.flush();
    }
}

impl<T: Alert + ?Sized> Alert for &T {
    fn notify(&self, title: &str, message: &str) {
        (**self).notify(title, message)
    }
}

impl<T: Alert + ?Sized> Alert for Box<T> {
    fn notify(&self, title: &str, message: &str) {
        (**self).notify(title, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records notifications instead of showing them.
    #[derive(Default)]
    struct RecordingAlert(RefCell<Vec<(String, String)>>);

    impl Alert for RecordingAlert {
        fn notify(&self, title: &str, message: &str) {
            self.0.borrow_mut().push((title.to_owned(), message.to_owned()));
        }
    }

    #[test]
    fn forwards_through_references_and_boxes() {
        let rec = RecordingAlert::default();
        (&rec).notify("a", "1");
        let boxed: Box<&dyn Alert> = Box::new(&rec);
        boxed.notify("b", "2");

        assert_eq!(
            *rec.0.borrow(),
            vec![("a".into(), "1".into()), ("b".into(), "2".into())]
        );
    }

    #[test]
    fn log_alert_does_not_panic() {
        LogAlert.notify("Rendering context unavailable", "no adapter");
    }
}
