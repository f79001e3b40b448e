use error_stack::{Context, Report};

// We need to dissect the error of figment so that
// we can get more info on why the configuration
// fails to parse (from a file or environment vars)
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, e: figment::Error) -> Report<T> {
        // figment chains every error it collected while extracting
        e.into_iter().fold(self, attach_single)
    }
}

fn attach_single<T: Context>(report: Report<T>, e: figment::Error) -> Report<T> {
    let mut this = report.attach_printable(format!("{}", e.kind));

    if let (Some(profile), Some(md)) = (&e.profile, &e.metadata) {
        if !e.path.is_empty() {
            let key = md.interpolate(profile, &e.path);
            this = this.attach_printable(format!("for key {key:?}"));
        }
    }

    if let Some(md) = &e.metadata {
        if let Some(source) = &md.source {
            this = this.attach_printable(format!("in {source} {}", md.name));
        } else {
            this = this.attach_printable(format!("in {}", md.name));
        }
    }

    this
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{providers::Serialized, Figment};
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("test context")]
    struct TestContext;

    #[derive(Debug, serde::Deserialize)]
    #[allow(unused)]
    struct Sample {
        count: u32,
    }

    #[test]
    fn attaches_error_kind() {
        let error = Figment::from(Serialized::defaults(serde_json::json!({ "count": "many" })))
            .extract::<Sample>()
            .unwrap_err();

        let report = Report::new(TestContext).attach_figment_error(error);
        let rendered = format!("{report:?}");
        assert!(rendered.contains("expected u32"), "{rendered}");
    }
}
