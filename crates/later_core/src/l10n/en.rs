//! English catalog.

pub(super) const CATALOG: &[(&str, &str)] = &[
    ("appTitle", "Later"),
    ("spacesTitle", "Spaces"),
    ("notesTitle", "Notes"),
    ("listsTitle", "Lists"),
    ("todosTitle", "Todos"),
    ("createSpace", "New space"),
    ("archiveSpace", "Archive space"),
    ("restoreSpace", "Restore space"),
    ("deleteSpaceConfirm", "Delete \"{spaceName}\"? This cannot be undone."),
    ("emptyNotes", "No notes yet. Capture your first idea."),
    ("emptyLists", "No lists yet."),
    ("emptyTodos", "Nothing to do. Enjoy the calm."),
    ("listProgress", "{checked} of {total} checked"),
    ("todoProgress", "{completed} of {total} done"),
    ("themeSystem", "System"),
    ("themeLight", "Light"),
    ("themeDark", "Dark"),
    ("signIn", "Sign in"),
    ("signUp", "Create account"),
    ("signOut", "Sign out"),
    ("continueAnonymously", "Continue without an account"),
    ("errorDatabaseNotFound", "The requested item could not be found."),
    ("errorDatabasePermissionDenied", "You do not have permission to access this item."),
    ("errorDatabaseUniqueConstraint", "An item with these details already exists."),
    ("errorDatabaseForeignKeyConstraint", "This item is still referenced by other content."),
    ("errorDatabaseNotNullConstraint", "A required value is missing."),
    ("errorDatabaseTimeout", "The database took too long to respond."),
    ("errorDatabaseGeneric", "Something went wrong while saving your data."),
    ("errorAuthInvalidCredentials", "Email or password is incorrect."),
    ("errorAuthUserAlreadyExists", "An account with this email already exists."),
    ("errorAuthWeakPassword", "Password must be at least 8 characters long."),
    ("errorAuthInvalidEmail", "Please enter a valid email address."),
    ("errorAuthEmailNotConfirmed", "Please confirm your email address first."),
    ("errorAuthSessionExpired", "Your session has expired. Please sign in again."),
    ("errorAuthRateLimitExceeded", "Too many attempts. Please try again later."),
    ("errorAuthAnonymousSignInFailed", "Could not start a guest session."),
    ("errorAuthUpgradeFailed", "Could not convert your guest account."),
    ("errorAuthAlreadyAuthenticated", "You are already signed in."),
    ("errorAuthGeneric", "Authentication failed."),
    ("errorNetworkTimeout", "The request timed out."),
    ("errorNetworkNoConnection", "No connection. Check your network and try again."),
    ("errorNetworkServerError", "The server encountered an error."),
    ("errorNetworkBadRequest", "The request was invalid."),
    ("errorNetworkNotFound", "The requested resource was not found."),
    ("errorNetworkGeneric", "A network error occurred."),
    ("errorValidationRequired", "{fieldName} is required."),
    ("errorValidationInvalidFormat", "{fieldName} has an invalid format."),
    (
        "errorValidationOutOfRange",
        "{fieldName} must be between {min} and {max} characters.",
    ),
    ("errorValidationDuplicate", "{fieldName} contains duplicate values."),
];
