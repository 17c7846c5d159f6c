//! German catalog.

pub(super) const CATALOG: &[(&str, &str)] = &[
    ("appTitle", "Later"),
    ("spacesTitle", "Bereiche"),
    ("notesTitle", "Notizen"),
    ("listsTitle", "Listen"),
    ("todosTitle", "Aufgaben"),
    ("createSpace", "Neuer Bereich"),
    ("archiveSpace", "Bereich archivieren"),
    ("restoreSpace", "Bereich wiederherstellen"),
    (
        "deleteSpaceConfirm",
        "\"{spaceName}\" löschen? Dies kann nicht rückgängig gemacht werden.",
    ),
    ("emptyNotes", "Noch keine Notizen. Halte deine erste Idee fest."),
    ("emptyLists", "Noch keine Listen."),
    ("emptyTodos", "Nichts zu tun. Genieße die Ruhe."),
    ("listProgress", "{checked} von {total} abgehakt"),
    ("todoProgress", "{completed} von {total} erledigt"),
    ("themeSystem", "System"),
    ("themeLight", "Hell"),
    ("themeDark", "Dunkel"),
    ("signIn", "Anmelden"),
    ("signUp", "Konto erstellen"),
    ("signOut", "Abmelden"),
    ("continueAnonymously", "Ohne Konto fortfahren"),
    ("errorDatabaseNotFound", "Der angeforderte Eintrag wurde nicht gefunden."),
    (
        "errorDatabasePermissionDenied",
        "Du hast keine Berechtigung für diesen Eintrag.",
    ),
    (
        "errorDatabaseUniqueConstraint",
        "Ein Eintrag mit diesen Angaben existiert bereits.",
    ),
    (
        "errorDatabaseForeignKeyConstraint",
        "Dieser Eintrag wird noch von anderen Inhalten verwendet.",
    ),
    ("errorDatabaseNotNullConstraint", "Ein Pflichtwert fehlt."),
    ("errorDatabaseTimeout", "Die Datenbank hat zu lange gebraucht."),
    (
        "errorDatabaseGeneric",
        "Beim Speichern deiner Daten ist ein Fehler aufgetreten.",
    ),
    ("errorAuthInvalidCredentials", "E-Mail oder Passwort ist falsch."),
    (
        "errorAuthUserAlreadyExists",
        "Ein Konto mit dieser E-Mail existiert bereits.",
    ),
    (
        "errorAuthWeakPassword",
        "Das Passwort muss mindestens 8 Zeichen lang sein.",
    ),
    ("errorAuthInvalidEmail", "Bitte gib eine gültige E-Mail-Adresse ein."),
    (
        "errorAuthEmailNotConfirmed",
        "Bitte bestätige zuerst deine E-Mail-Adresse.",
    ),
    (
        "errorAuthSessionExpired",
        "Deine Sitzung ist abgelaufen. Bitte melde dich erneut an.",
    ),
    (
        "errorAuthRateLimitExceeded",
        "Zu viele Versuche. Bitte versuche es später erneut.",
    ),
    (
        "errorAuthAnonymousSignInFailed",
        "Die Gastsitzung konnte nicht gestartet werden.",
    ),
    (
        "errorAuthUpgradeFailed",
        "Dein Gastkonto konnte nicht umgewandelt werden.",
    ),
    ("errorAuthAlreadyAuthenticated", "Du bist bereits angemeldet."),
    ("errorAuthGeneric", "Die Anmeldung ist fehlgeschlagen."),
    ("errorNetworkTimeout", "Die Anfrage hat zu lange gedauert."),
    (
        "errorNetworkNoConnection",
        "Keine Verbindung. Prüfe dein Netzwerk und versuche es erneut.",
    ),
    ("errorNetworkServerError", "Auf dem Server ist ein Fehler aufgetreten."),
    ("errorNetworkBadRequest", "Die Anfrage war ungültig."),
    (
        "errorNetworkNotFound",
        "Die angeforderte Ressource wurde nicht gefunden.",
    ),
    ("errorNetworkGeneric", "Ein Netzwerkfehler ist aufgetreten."),
    ("errorValidationRequired", "{fieldName} ist erforderlich."),
    ("errorValidationInvalidFormat", "{fieldName} hat ein ungültiges Format."),
    (
        "errorValidationOutOfRange",
        "{fieldName} muss zwischen {min} und {max} Zeichen lang sein.",
    ),
    ("errorValidationDuplicate", "{fieldName} enthält doppelte Werte."),
];
