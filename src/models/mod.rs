//! Card, widget, action and response value model.

pub mod action;
pub mod card;
pub mod factory;
pub mod response;
pub mod style;
pub mod widget;

pub use action::{
    Action, AuthorizationAction, Clickable, ComposeAction, ComposedEmailType, InteractionMode,
    LoadIndicator, OnClick, OnClose, OpenAs, OpenLink, OverflowMenu, OverflowMenuItem,
};
pub use card::{
    ActionRef, Area, Card, CardAction, CardBuilder, CardHeader, CardSection, CardSectionBuilder,
    DisplayStyle, FixedFooter, Surface, MAX_SECTIONS, MAX_WIDGETS_PER_SECTION,
};
pub use factory::CardService;
pub use response::{
    ActionResponse, ActionResponseBuilder, ComposeResponse, ContentType, DialogResponse,
    DraftRef, DraftUpdate, InsertPosition, Navigation, NavigationOp, Notification, ResponseKind,
    StatusCode, SuggestionsResponse, UniversalResponse, UpdateDraftResponse,
};
pub use style::{
    BorderStyle, BorderType, Color, HorizontalAlignment, Icon, IconSource, ImageCropStyle,
    ImageCropType, ImageType, KnownIcon,
};
pub use widget::{
    Button, ButtonSet, Chip, ChipList, ChipListLayout, DateTimePicker, DateTimePickerType,
    DecoratedText, DecoratedTextControl, Divider, Grid, GridItem, GridItemLayout, Image,
    ImageButton, ImageComponent, Resolved, SelectionInput, SelectionInputType, SelectionItem,
    Switch, SwitchControlType, TextButton, TextButtonStyle, TextInput, TextParagraph, Trigger,
    Widget,
};
