//! Thin helpers over the objc2 runtime.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

pub use objc2::rc::Retained;
pub use objc2::runtime::{AnyClass, AnyObject, Bool, Sel};
pub use objc2::{msg_send, sel, ClassType};
pub use objc2_app_kit::{NSApplication, NSMenu, NSMenuItem};
pub use objc2_foundation::NSString;

/// Objective-C object pointer.
pub type id = *mut AnyObject;

pub const nil: id = std::ptr::null_mut();

pub const YES: Bool = Bool::YES;

pub const NO: Bool = Bool::NO;

/// NSEventModifierFlags bits used by key equivalents.
pub const NS_MODIFIER_SHIFT: usize = 1 << 17;
pub const NS_MODIFIER_CONTROL: usize = 1 << 18;
pub const NS_MODIFIER_OPTION: usize = 1 << 19;
pub const NS_MODIFIER_COMMAND: usize = 1 << 20;

/// NSControlStateValue.
pub const NS_CONTROL_STATE_OFF: isize = 0;
pub const NS_CONTROL_STATE_ON: isize = 1;

/// First of the NSF1FunctionKey..NSF35FunctionKey private-use characters.
pub const NS_F1_FUNCTION_KEY: u32 = 0xF704;

#[inline]
pub fn nsstring(s: &str) -> Retained<NSString> {
    NSString::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appkit_classes_are_linked() {
        assert_eq!(NSMenu::class().name(), c"NSMenu");
        assert_eq!(NSMenuItem::class().name(), c"NSMenuItem");
        assert!(AnyClass::get(c"NSMenu").is_some());
    }
}
