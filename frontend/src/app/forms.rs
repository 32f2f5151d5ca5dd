use anyhow::Result;

/// Read-only view of one form widget's current text.
///
/// Controllers depend on this capability instead of on concrete widget types,
/// so tests can hand in plain strings.
pub trait FormField {
    fn read(&self) -> String;
}

impl FormField for slint::SharedString {
    fn read(&self) -> String {
        self.to_string()
    }
}

impl FormField for String {
    fn read(&self) -> String {
        self.clone()
    }
}

impl FormField for &str {
    fn read(&self) -> String {
        (*self).to_string()
    }
}

/// One query's worth of user input, read from the form at submit time and
/// discarded after the fetch+render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
}

/// The four fields of a statistics tab form.
pub struct QueryForm<'a> {
    pub city: &'a dyn FormField,
    pub start_date: &'a dyn FormField,
    pub end_date: &'a dyn FormField,
    pub frequency: &'a dyn FormField,
}

/// Read the form exactly once and hand the values, unmodified, to `run`.
/// Whatever `run` returns (including validation failures from the fetcher)
/// is passed straight back to the caller.
pub fn submit_query<F>(form: &QueryForm<'_>, run: F) -> Result<()>
where
    F: FnOnce(QueryParameters) -> Result<()>,
{
    run(QueryParameters {
        city: form.city.read(),
        start_date: form.start_date.read(),
        end_date: form.end_date.read(),
        frequency: form.frequency.read(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn form<'a>(
        city: &'a dyn FormField,
        start: &'a dyn FormField,
        end: &'a dyn FormField,
        frequency: &'a dyn FormField,
    ) -> QueryForm<'a> {
        QueryForm {
            city,
            start_date: start,
            end_date: end,
            frequency,
        }
    }

    #[test]
    fn test_submit_passes_field_values_through_unmodified() {
        let seen: RefCell<Vec<QueryParameters>> = RefCell::new(Vec::new());

        let result = submit_query(
            &form(&"Moscow", &"2024-01-01", &"2024-01-31", &"1d"),
            |params| {
                seen.borrow_mut().push(params);
                Ok(())
            },
        );

        assert!(result.is_ok());
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            QueryParameters {
                city: "Moscow".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: "2024-01-31".to_string(),
                frequency: "1d".to_string(),
            }
        );
    }

    #[test]
    fn test_submit_propagates_validation_failure() {
        let result = submit_query(
            &form(&"Moscow", &"2024-01-01", &"2024-01-31", &"invalid_frequency"),
            |params| {
                params.frequency.parse::<visualcrossing::Frequency>()?;
                panic!("renderer must not run for an invalid frequency");
            },
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("frequency"), "got: {}", err);
    }

    #[test]
    fn test_shared_string_reads_back_its_text() {
        let field = slint::SharedString::from("2024-12-17");
        assert_eq!(field.read(), "2024-12-17");
    }
}
