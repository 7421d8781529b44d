use rewind_core::SnapshotLevel;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Locale {
    En,
    Ru,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Message {
    Warning,
    Continue,
    Cancelled,
    SelectingDate,
    SelectedUrl,
    CheckingAvailability,
    BackingUp,
    WritingMirrorlist,
    Updating,
    Restoring,
    Restored,
    RestoringAfterFailure,
    RestoringOnExit,
    Success,
    SelectDifferentDate,
    ChooseAnotherDate,
    DryRun,
    OptionalMissing,
    ChoicePrompt,
    InvalidChoice,
    SelectYear,
    SelectMonth,
    SelectDay,
}

impl Locale {
    pub(crate) fn detect() -> Self {
        let lc_all = std::env::var("LC_ALL").ok();
        let lang = std::env::var("LANG").ok();
        Self::from_env_values(lc_all.as_deref(), lang.as_deref())
    }

    pub(crate) fn from_env_values(lc_all: Option<&str>, lang: Option<&str>) -> Self {
        let raw = lc_all
            .filter(|value| !value.trim().is_empty())
            .or(lang)
            .unwrap_or("");
        let language = raw
            .split('.')
            .next()
            .unwrap_or("")
            .split('_')
            .next()
            .unwrap_or("");
        match language.to_ascii_lowercase().as_str() {
            "ru" => Self::Ru,
            _ => Self::En,
        }
    }

    pub(crate) fn text(self, message: Message) -> &'static str {
        match self {
            Self::En => english(message),
            Self::Ru => russian(message),
        }
    }

    pub(crate) fn level_prompt(self, level: SnapshotLevel) -> &'static str {
        self.text(match level {
            SnapshotLevel::Year => Message::SelectYear,
            SnapshotLevel::Month => Message::SelectMonth,
            SnapshotLevel::Day => Message::SelectDay,
        })
    }

    pub(crate) fn is_affirmative(self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        match self {
            Self::En => matches!(answer.as_str(), "y" | "yes"),
            Self::Ru => matches!(answer.as_str(), "y" | "yes" | "д" | "да"),
        }
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::Warning => {
            "WARNING: This utility will modify your mirrorlist and update packages."
        }
        Message::Continue => "Continue? (y/N): ",
        Message::Cancelled => "Operation cancelled.",
        Message::SelectingDate => "Selecting date from archive...",
        Message::SelectedUrl => "Selected archive URL:",
        Message::CheckingAvailability => "Checking archive availability...",
        Message::BackingUp => "Backing up mirrorlist...",
        Message::WritingMirrorlist => "Writing new mirror...",
        Message::Updating => "Updating packages...",
        Message::Restoring => "Restoring mirrorlist...",
        Message::Restored => "Mirrorlist restored.",
        Message::RestoringAfterFailure => "Restoring mirrorlist after failure...",
        Message::RestoringOnExit => "Restoring mirrorlist on exit...",
        Message::Success => "Operation completed successfully!",
        Message::SelectDifferentDate => "Please select a different date.",
        Message::ChooseAnotherDate => "Choose another date? (y/N): ",
        Message::DryRun => "Dry run: mirrorlist left unchanged. Would write:",
        Message::OptionalMissing => "Optional repository not available for this date:",
        Message::ChoicePrompt => "Enter a number (q to cancel): ",
        Message::InvalidChoice => "Invalid choice, try again.",
        Message::SelectYear => "Select year:",
        Message::SelectMonth => "Select month:",
        Message::SelectDay => "Select day:",
    }
}

fn russian(message: Message) -> &'static str {
    match message {
        Message::Warning => "ВНИМАНИЕ: Эта утилита изменит ваш mirrorlist и обновит пакеты.",
        Message::Continue => "Продолжить? (y/N): ",
        Message::Cancelled => "Операция отменена.",
        Message::SelectingDate => "Выбор даты из архива...",
        Message::SelectedUrl => "Выбранный URL архива:",
        Message::CheckingAvailability => "Проверка доступности архива...",
        Message::BackingUp => "Создание резервной копии mirrorlist...",
        Message::WritingMirrorlist => "Запись нового зеркала...",
        Message::Updating => "Обновление пакетов...",
        Message::Restoring => "Восстановление mirrorlist...",
        Message::Restored => "mirrorlist восстановлен.",
        Message::RestoringAfterFailure => "Восстановление mirrorlist после ошибки...",
        Message::RestoringOnExit => "Восстановление mirrorlist при выходе...",
        Message::Success => "Операция завершена успешно!",
        Message::SelectDifferentDate => "Пожалуйста, выберите другую дату.",
        Message::ChooseAnotherDate => "Выбрать другую дату? (y/N): ",
        Message::DryRun => "Пробный запуск: mirrorlist не изменён. Была бы записана строка:",
        Message::OptionalMissing => "Необязательный репозиторий недоступен на эту дату:",
        Message::ChoicePrompt => "Введите номер (q для отмены): ",
        Message::InvalidChoice => "Неверный выбор, попробуйте снова.",
        Message::SelectYear => "Выберите год:",
        Message::SelectMonth => "Выберите месяц:",
        Message::SelectDay => "Выберите день:",
    }
}
