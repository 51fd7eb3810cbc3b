//! Built-in extern-api handler set.

use std::path::Path;

use uidriver_protocols::error::ApiCallErr;
use uidriver_protocols::events::KEYCODE_NONE;
use uidriver_protocols::value::Value;

use crate::actions::{CombinedKeys, SingleKey, TouchOp};
use crate::dom::{ATTR_ID, ATTR_KEY, ATTR_TEXT, ATTR_TYPE};
use crate::extern_api::{
    get_item, get_item_or, get_parcel, parcel_from_value, parcel_to_value, push_item, push_parcel,
    Engine,
};
use crate::image::WidgetImage;
use crate::selector::{AttrMatcher, MatchPattern, Selector};

/// Install the built-in `By.` / `UiDriver.` / `UiComponent.` handlers, in
/// a fixed order.
pub(crate) fn register_builtin(engine: &mut Engine) {
    engine.add_handler(Box::new(by_builder_handler));
    engine.add_handler(Box::new(driver_handler));
    engine.add_handler(Box::new(component_handler));
}

// Shared completion: Ok(true) handled, Ok(false) not mine, Err recorded
// into the transaction error slot.
fn finish(outcome: Result<bool, ApiCallErr>, err: &mut ApiCallErr) -> bool {
    match outcome {
        Ok(handled) => handled,
        Err(error) => {
            *err = error;
            true
        }
    }
}

fn read_pattern(input: &[Value], index: usize) -> Result<MatchPattern, ApiCallErr> {
    let raw = get_item_or::<i64>(input, index, MatchPattern::Eq as i64)?;
    MatchPattern::from_raw(raw).ok_or_else(|| ApiCallErr::usage(format!("unknown match pattern {raw}")))
}

/// `By.<attr>` builders: append a matcher to the caller selector and echo
/// the grown selector back through the updated caller.
fn by_builder_handler(
    _engine: &Engine,
    function: &str,
    caller: &mut Value,
    input: &[Value],
    _out: &mut Vec<Value>,
    err: &mut ApiCallErr,
) -> bool {
    let Some(op) = function.strip_prefix("By.") else {
        return false;
    };
    let outcome = (|| {
        let matcher = match op {
            "text" => AttrMatcher::new(ATTR_TEXT, get_item::<String>(input, 0)?, read_pattern(input, 1)?),
            "id" => AttrMatcher::new(ATTR_ID, get_item::<String>(input, 0)?, read_pattern(input, 1)?),
            "key" => AttrMatcher::new(ATTR_KEY, get_item::<String>(input, 0)?, read_pattern(input, 1)?),
            "type" => AttrMatcher::new(ATTR_TYPE, get_item::<String>(input, 0)?, read_pattern(input, 1)?),
            "attr" => AttrMatcher::new(
                get_item::<String>(input, 0)?,
                get_item::<String>(input, 1)?,
                read_pattern(input, 2)?,
            ),
            _ => return Ok(false),
        };
        let mut selector: Selector = parcel_from_value(caller)?;
        selector.add_matcher(matcher);
        *caller = parcel_to_value(&selector)?;
        Ok(true)
    })();
    finish(outcome, err)
}

/// `UiDriver.` operations. The caller value is echoed back unchanged; the
/// engine's configured target device selects the controller.
fn driver_handler(
    engine: &Engine,
    function: &str,
    _caller: &mut Value,
    input: &[Value],
    out: &mut Vec<Value>,
    err: &mut ApiCallErr,
) -> bool {
    let Some(op) = function.strip_prefix("UiDriver.") else {
        return false;
    };
    let outcome = (|| {
        let driver = engine.driver();
        match op {
            "findComponent" => {
                let selector: Selector = get_parcel(input, 0)?;
                if let Some(image) = driver.find_widgets(&selector)?.into_iter().next() {
                    push_parcel(&image, out)?;
                }
            }
            "findComponents" => {
                let selector: Selector = get_parcel(input, 0)?;
                for image in driver.find_widgets(&selector)? {
                    push_parcel(&image, out)?;
                }
            }
            "pressBack" => driver.trigger_key(&SingleKey::back())?,
            "pressHome" => driver.trigger_key(&SingleKey::home())?,
            "triggerKey" => {
                let code = get_item::<i64>(input, 0)?;
                driver.trigger_key(&SingleKey::new(code as i32))?;
            }
            "triggerCombineKeys" => {
                let ctrl = get_item::<i64>(input, 0)?;
                let first = get_item::<i64>(input, 1)?;
                let second = get_item_or::<i64>(input, 2, i64::from(KEYCODE_NONE))?;
                let mut codes = vec![first as i32];
                if second as i32 != KEYCODE_NONE {
                    codes.push(second as i32);
                }
                driver.trigger_key(&CombinedKeys::new(ctrl as i32, codes))?;
            }
            "typeChar" => {
                let text = get_item::<String>(input, 0)?;
                let ch = text
                    .chars()
                    .next()
                    .ok_or_else(|| ApiCallErr::usage("empty character argument"))?;
                driver.type_char(ch)?;
            }
            "screenCap" => {
                let path = get_item::<String>(input, 0)?;
                driver.take_screen_cap(Path::new(&path))?;
                push_item(true, out);
            }
            "waitForIdle" => {
                let idle_ms = get_item::<i64>(input, 0)?;
                let timeout_sec = get_item::<i64>(input, 1)?;
                let reached = driver.wait_for_ui_steady(idle_ms as u32, timeout_sec as u32)?;
                push_item(reached, out);
            }
            "dumpLayout" => {
                let dump = driver.dump_ui_hierarchy()?;
                push_item(dump.to_string(), out);
            }
            _ => return Ok(false),
        }
        Ok(true)
    })();
    finish(outcome, err)
}

/// `UiComponent.` operations. The caller is the widget-image parcel; the
/// refreshed image is echoed back through the updated caller.
fn component_handler(
    engine: &Engine,
    function: &str,
    caller: &mut Value,
    input: &[Value],
    out: &mut Vec<Value>,
    err: &mut ApiCallErr,
) -> bool {
    let Some(op) = function.strip_prefix("UiComponent.") else {
        return false;
    };
    let outcome = (|| {
        let mut image: WidgetImage = parcel_from_value(caller)?;
        let driver = engine.driver();
        match op {
            "click" => driver.perform_widget_operate(&mut image, TouchOp::Click)?,
            "longClick" => driver.perform_widget_operate(&mut image, TouchOp::LongClick)?,
            "doubleClick" => driver.perform_widget_operate(&mut image, TouchOp::DoubleClick)?,
            "inputText" => {
                let text = get_item::<String>(input, 0)?;
                driver.input_text(&mut image, &text)?;
            }
            "getAttribute" => {
                let name = get_item::<String>(input, 0)?;
                let default = get_item_or::<String>(input, 1, String::new())?;
                driver.update_widget_image(&mut image)?;
                push_item(image.attribute(&name, &default), out);
            }
            "getBounds" => {
                driver.update_widget_image(&mut image)?;
                let bounds = image.bounds().ok_or_else(|| {
                    ApiCallErr::usage(format!(
                        "widget has no display bounds, selected by: {}",
                        image.selection_desc()
                    ))
                })?;
                push_parcel(&bounds, out)?;
            }
            "scrollSearch" => {
                let target: Selector = get_parcel(input, 0)?;
                let offset = get_item_or::<i64>(input, 1, 0)?;
                if let Some(found) = driver.scroll_search(&mut image, &target, offset as i32)? {
                    push_parcel(&found, out)?;
                }
            }
            _ => return Ok(false),
        }
        *caller = parcel_to_value(&image)?;
        Ok(true)
    })();
    finish(outcome, err)
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
