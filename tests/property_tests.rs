//! Property-based tests for pipeline_logger using proptest

use parking_lot::Mutex;
use pipeline_logger::config::LevelValue;
use pipeline_logger::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering follows the numeric severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1.as_number();
        let val2 = level2.as_number();

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
        prop_assert_eq!(level1 >= level2, val1 >= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Test that numeric levels map back to the same level
    #[test]
    fn test_log_level_number_roundtrip(level in any_level()) {
        prop_assert_eq!(LogLevel::from_number(level.as_number()), Some(level));
    }

    /// Test that parsing accepts case-insensitive input
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        let parsed: std::result::Result<LogLevel, String> = input.parse();
        prop_assert_eq!(parsed, Ok(level));
    }

    /// Test that document level names resolve like direct parsing
    #[test]
    fn test_level_value_resolves_names(level in any_level()) {
        let value = LevelValue::Name(level.to_str().to_string());
        prop_assert_eq!(value.resolve("property").unwrap(), Some(level));
    }

    /// Test that numbers outside the defined levels are rejected
    #[test]
    fn test_level_value_rejects_undefined_numbers(n in 1u32..200) {
        prop_assume!(n % 10 != 0 || n > 50);
        prop_assert!(LevelValue::Number(n).resolve("property").is_err());
    }

    /// Test that random words are not accepted as levels
    #[test]
    fn test_log_level_invalid_parse(invalid_str in "[xyzqXYZQ]{1,12}") {
        prop_assert!(invalid_str.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// LogRecord Message Sanitization Tests
// ============================================================================

proptest! {
    /// Test that control characters never reach a record's message
    #[test]
    fn test_message_sanitization(message in ".*") {
        let record = LogRecord::new("prop", LogLevel::Info, message.clone());

        prop_assert!(!record.message.contains('\n'));
        prop_assert!(!record.message.contains('\r'));
        prop_assert!(!record.message.contains('\t'));

        if message.contains('\n') {
            prop_assert!(record.message.contains("\\n"));
        }
    }

    /// Test that formatting a record always yields a single line
    #[test]
    fn test_formatted_line_is_single_line(
        name in "[a-z_.]{1,20}",
        message in ".*",
        level in any_level(),
    ) {
        let formatter = Formatter::from_config(
            Some("%(asctime)s - %(name)s - %(levelname)s - %(message)s"),
            Some("%Y-%m-%d %H:%M:%S"),
        )
        .unwrap();
        let line = formatter.format(&LogRecord::new(&name, level, message));

        prop_assert!(!line.contains('\n'));
        let expected = format!(" - {} - {} - ", name, level.to_str());
        prop_assert!(line.contains(&expected));
    }
}

// ============================================================================
// Threshold Tests
// ============================================================================

struct Counter(Arc<Mutex<usize>>);

impl Handler for Counter {
    fn emit(&mut self, _record: &LogRecord, _line: &str) -> Result<()> {
        *self.0.lock() += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> &str {
        "counter"
    }
}

proptest! {
    /// A record is written iff it passes both the logger and the handler level
    #[test]
    fn test_two_thresholds(
        logger_level in any_level(),
        handler_level in any_level(),
        record_level in any_level(),
    ) {
        let count = Arc::new(Mutex::new(0));
        let handler = HandlerSlot::new(
            "counter",
            handler_level,
            Formatter::default().shared(),
            Box::new(Counter(Arc::clone(&count))),
        );
        let logger = Logger::builder("threshold")
            .level(logger_level)
            .handler(handler.shared())
            .build();

        logger.log(record_level, "probe");

        let expected = usize::from(record_level >= logger_level && record_level >= handler_level);
        prop_assert_eq!(*count.lock(), expected);
    }

    /// Children with no level of their own follow the nearest configured ancestor
    #[test]
    fn test_effective_level_inherited(
        root_level in any_level(),
        parent_level in proptest::option::of(any_level()),
    ) {
        let registry = Registry::new(root_level);
        let parent = registry.get_logger("pipeline");
        parent.set_level(parent_level);
        let child = registry.get_logger("pipeline.stage.step");

        prop_assert_eq!(child.effective_level(), parent_level.unwrap_or(root_level));
    }
}
