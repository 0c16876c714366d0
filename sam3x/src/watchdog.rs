//! Watchdog timer.
//!
//! The watchdog runs after reset; firmware that does not feed it has to turn it off
//! early. The mode register can only be written once after reset.

use sam3x8e::Peripherals as DevicePeripherals;

/// Turn the watchdog off.
pub unsafe fn disable() {
    let dp = DevicePeripherals::steal();

    dp.WDT.mr.write(|w| w.wddis().set_bit());
}
